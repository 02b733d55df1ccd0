use crate::url::parse_http_url;
use crate::UrlResult;

/// Query parameter that selects an index page
pub const PAGE_PARAM: &str = "page";

/// Builds the URL of one index page
///
/// The page parameter is appended to whatever query the listing URL already
/// carries, so filtered listings keep their filters. A `page` pair already
/// present on the listing URL is replaced.
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::index_page_url;
///
/// let url = index_page_url("https://example.com/games", 3).unwrap();
/// assert_eq!(url, "https://example.com/games?page=3");
///
/// let url = index_page_url("https://example.com/games?sort=trending", 1).unwrap();
/// assert_eq!(url, "https://example.com/games?sort=trending&page=1");
/// ```
pub fn index_page_url(base_url: &str, page: u32) -> UrlResult<String> {
    let mut url = parse_http_url(base_url)?;

    // Keep every pair except a stale page number
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(PAGE_PARAM, &page.to_string());
    Ok(url.to_string())
}

/// Builds the URLs of index pages `1..=page_count`, in page order
pub fn index_page_urls(base_url: &str, page_count: u32) -> UrlResult<Vec<String>> {
    (1..=page_count)
        .map(|page| index_page_url(base_url, page))
        .collect()
}
