//! Link harvester for paginated index pages
//!
//! Walks index pages `1..=page_count`, pulls the item-detail link out of every
//! card in each page's item grid, and merges them into one deduplicated set.
//! A page that fails to load, or whose cards cannot be read, is recorded as a
//! [`PageFailure`] and the walk continues. A page that loads but has no item
//! grid (typically past the end of the listing) is a soft miss, not a failure.

use crate::crawler::document::{attr, find_all_in, find_first_in, parse_document};
use crate::crawler::failure::{PageFailure, Phase};
use crate::crawler::fetcher::fetch_url;
use crate::crawler::session::Session;
use crate::url::{index_page_urls, resolve_link};
use crate::HarvestError;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::time::Instant;
use url::Url;

/// Container holding a page's item grid
pub const ITEM_GRID: &str = r#"div[class="row show-release toggle-fade"]"#;

/// One item card inside the grid
pub const ITEM_CARD: &str = r#"div[class="col-2 my-2 px-1 px-md-2"]"#;

/// Result of link discovery
#[derive(Debug, Default)]
pub struct LinkHarvest {
    /// Deduplicated absolute item URLs. Iteration order is unspecified.
    pub links: HashSet<String>,
    /// Pages that failed to load or could not be read
    pub failures: Vec<PageFailure>,
    /// Pages that loaded without an item grid
    pub soft_misses: Vec<String>,
    /// Pages never requested because the run was cancelled
    pub skipped: usize,
}

impl LinkHarvest {
    /// Links in lexical order, for deterministic downstream processing
    pub fn sorted_links(&self) -> Vec<String> {
        let mut links: Vec<String> = self.links.iter().cloned().collect();
        links.sort();
        links
    }
}

/// Outcome of a single index page
#[derive(Debug)]
enum PageOutcome {
    Links(Vec<String>),
    NoGrid,
    Failed(PageFailure),
    Skipped,
}

/// Discovers item-detail links across `page_count` index pages
///
/// # Arguments
///
/// * `session` - Client, identity pool, concurrency limit and cancellation
/// * `base_url` - Listing URL; `?page=N` is appended for each page
/// * `origin` - Prefix for site-relative item links
/// * `page_count` - Number of pages to walk, at least 1
///
/// # Returns
///
/// * `Ok(LinkHarvest)` - Always, once the inputs are valid
/// * `Err(HarvestError)` - Invalid inputs, before any request is sent
pub async fn discover_links(
    session: &Session,
    base_url: &str,
    origin: &Url,
    page_count: u32,
) -> Result<LinkHarvest, HarvestError> {
    if page_count < 1 {
        return Err(HarvestError::InvalidInput(format!(
            "page count must be positive, got {}",
            page_count
        )));
    }
    // Malformed listing URL fails here, before any request
    let page_urls = index_page_urls(base_url, page_count)?;

    tracing::info!("Getting item links from {} index pages", page_count);

    let start_time = Instant::now();
    let mut harvest = LinkHarvest::default();
    let mut pages_done = 0usize;

    let mut pages = stream::iter(page_urls)
        .map(|page_url| harvest_page(session, page_url, origin))
        .buffer_unordered(session.concurrency);

    while let Some((page_url, outcome)) = pages.next().await {
        match outcome {
            // Set semantics dedup links shared between pages
            PageOutcome::Links(links) => {
                tracing::debug!("{}: {} item links", page_url, links.len());
                harvest.links.extend(links);
            }
            // Past the end of the listing, not an error
            PageOutcome::NoGrid => {
                tracing::info!("No item grid on {}", page_url);
                harvest.soft_misses.push(page_url);
            }
            PageOutcome::Failed(failure) => {
                tracing::warn!("Index page failed: {}", failure);
                harvest.failures.push(failure);
            }
            PageOutcome::Skipped => {
                harvest.skipped += 1;
            }
        }

        // Progress reporting every 10 pages
        pages_done += 1;
        if pages_done % 10 == 0 {
            let rate = pages_done as f64 / start_time.elapsed().as_secs_f64();
            tracing::info!(
                "Progress: {}/{} index pages, {} links, {:.2} pages/sec",
                pages_done,
                page_count,
                harvest.links.len(),
                rate
            );
        }
    }

    tracing::info!("Number of links retrieved: {}", harvest.links.len());

    Ok(harvest)
}

/// Fetches and reads one index page
async fn harvest_page(session: &Session, page_url: String, origin: &Url) -> (String, PageOutcome) {
    if session.is_cancelled() {
        return (page_url, PageOutcome::Skipped);
    }

    // Fetch, then read the grid; any failure stays local to this page
    let outcome = match fetch_url(&session.client, &session.agents, &page_url).await {
        Ok(body) => match links_on_page(&body, origin) {
            Ok(Some(links)) => PageOutcome::Links(links),
            Ok(None) => PageOutcome::NoGrid,
            Err(reason) => {
                PageOutcome::Failed(PageFailure::extraction(Phase::Discovery, &page_url, reason))
            }
        },
        Err(e) => PageOutcome::Failed(PageFailure::fetch(Phase::Discovery, e)),
    };

    (page_url, outcome)
}

/// Extracts absolute item links from an index page's markup
///
/// # Returns
///
/// * `Ok(Some(links))` - The item grid was found (links may be empty)
/// * `Ok(None)` - The page has no item grid
/// * `Err(reason)` - A card has no hyperlink; the page yields nothing
pub fn links_on_page(body: &str, origin: &Url) -> Result<Option<Vec<String>>, String> {
    let document = parse_document(body);

    let Some(grid) = document.find_first(ITEM_GRID) else {
        return Ok(None);
    };

    let mut links = Vec::new();
    for (index, card) in find_all_in(grid, ITEM_CARD).into_iter().enumerate() {
        // One unreadable card fails the whole page
        let href = find_first_in(card, "a")
            .and_then(|anchor| attr(anchor, "href"))
            .ok_or_else(|| format!("item card {} has no link", index + 1))?;

        match resolve_link(href, origin) {
            Some(link) => links.push(link),
            None => tracing::debug!("Skipping unusable item link {:?}", href),
        }
    }

    Ok(Some(links))
}
