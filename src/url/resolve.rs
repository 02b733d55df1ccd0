use url::Url;

/// Resolves an item-card href against the site origin
///
/// Returns None if the link cannot name a detail page:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - anything that is not http(s) after resolution
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::resolve_link;
/// use url::Url;
///
/// let origin = Url::parse("https://www.backloggd.com").unwrap();
/// assert_eq!(
///     resolve_link("/games/hades/", &origin),
///     Some("https://www.backloggd.com/games/hades/".to_string())
/// );
/// ```
pub fn resolve_link(href: &str, origin: &Url) -> Option<String> {
    let href = href.trim();

    // Skip empty and fragment-only links
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    // Skip non-navigational schemes
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Absolute hrefs replace the origin entirely
    match origin.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
