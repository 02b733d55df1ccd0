use crate::{UrlError, UrlResult};
use url::Url;

/// Parses an absolute http(s) URL
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::parse_http_url;
///
/// assert!(parse_http_url("https://example.com/games").is_ok());
/// assert!(parse_http_url("/games").is_err());
/// assert!(parse_http_url("mailto:someone@example.com").is_err());
/// ```
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    // Only http(s) can be fetched
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Returns the origin (`scheme://host[:port]`) of a URL
///
/// Item links on index pages are site-relative; this origin is what they get
/// prefixed with.
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::site_origin;
///
/// let origin = site_origin("https://www.backloggd.com/games/lib/popular?page=2").unwrap();
/// assert_eq!(origin.as_str(), "https://www.backloggd.com/");
/// ```
pub fn site_origin(url_str: &str) -> UrlResult<Url> {
    let url = parse_http_url(url_str)?;
    let serialized = url.origin().ascii_serialization();
    Url::parse(&serialized).map_err(|e| UrlError::Parse(e.to_string()))
}
