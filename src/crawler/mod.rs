//! Crawler module for the two-phase harvest
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with rotating client identities
//! - Markup parsing behind a small query adapter
//! - Link discovery across paginated index pages
//! - Per-field record extraction from detail pages
//! - Compact-count normalization
//! - Overall pipeline coordination

mod coordinator;
mod document;
mod extractor;
mod failure;
mod fetcher;
mod harvester;
mod normalizer;
mod record;
mod session;

pub use coordinator::{Coordinator, HarvestReport, ItemHarvest};
pub use document::{
    attr, find_all_in, find_first_in, matches, next_sibling_element, parse_document, text_lines,
    text_of, Document,
};
pub use extractor::{extract_fields, extract_record, FieldRule, RuleResult, FIELD_RULES};
pub use failure::{FailureCause, PageFailure, Phase};
pub use fetcher::{build_http_client, fetch_url, UserAgentPool};
pub use harvester::{discover_links, links_on_page, LinkHarvest, ITEM_CARD, ITEM_GRID};
pub use normalizer::{
    normalize, normalize_count, normalize_record, parse_compact_count, NormalizationIssue,
};
pub use record::{Count, Dataset, Record};
pub use session::Session;

use crate::config::Config;
use crate::HarvestError;
use tokio_util::sync::CancellationToken;

/// Runs a complete harvest
///
/// This is the main entry point. It will:
/// 1. Validate the configuration
/// 2. Discover item links across the index pages
/// 3. Extract one record per link
/// 4. Normalize compact counters
///
/// Once `cancel` fires no new fetch is issued; requests already in flight
/// finish and their records are kept. Persisting the dataset is left to the
/// caller, so the report is still available when the write fails.
///
/// # Returns
///
/// * `Ok(HarvestReport)` - The run completed; see the report for failures
/// * `Err(HarvestError)` - Invalid configuration, before any request is sent
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::load_config;
/// use catalog_harvest::crawler::harvest;
/// use catalog_harvest::output::{CsvSink, DatasetSink};
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let sink = CsvSink::from_config(&config.output);
/// let report = harvest(config, CancellationToken::new()).await?;
/// sink.write(&report.dataset)?;
/// # Ok(())
/// # }
/// ```
pub async fn harvest(
    config: Config,
    cancel: CancellationToken,
) -> Result<HarvestReport, HarvestError> {
    let coordinator = Coordinator::new(config)?.with_cancellation(cancel);

    tracing::info!(
        "Harvesting {} pages of {}",
        coordinator.config().harvest.pages,
        coordinator.config().harvest.base_url
    );

    coordinator.run().await
}
