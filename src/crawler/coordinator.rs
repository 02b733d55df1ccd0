//! Harvest coordinator - two-phase pipeline orchestration
//!
//! This module ties the phases together:
//! - Validating the configuration before any request is sent
//! - Discovering item links across the index pages
//! - Extracting one record per item link
//! - Normalizing the compact counters of the finished dataset

use crate::config::{validate, Config};
use crate::crawler::extractor::extract_record;
use crate::crawler::failure::{PageFailure, Phase};
use crate::crawler::harvester::{discover_links, LinkHarvest};
use crate::crawler::normalizer::{normalize, NormalizationIssue};
use crate::crawler::record::{Dataset, Record};
use crate::crawler::session::Session;
use crate::url::site_origin;
use crate::HarvestError;
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Everything a run produced, successful or not
#[derive(Debug, Default)]
pub struct HarvestReport {
    /// Number of distinct item links discovered
    pub links_discovered: usize,
    /// Normalized records, one per item whose page loaded
    pub dataset: Dataset,
    /// Index pages and items that failed, in the order they completed
    pub failures: Vec<PageFailure>,
    /// Index pages that loaded without an item grid
    pub soft_misses: Vec<String>,
    /// Count values dropped by normalization
    pub normalization_issues: Vec<NormalizationIssue>,
    /// Pages and items never requested because the run was cancelled
    pub skipped: usize,
    pub elapsed: Duration,
}

impl HarvestReport {
    pub fn failures_in(&self, phase: Phase) -> impl Iterator<Item = &PageFailure> + '_ {
        self.failures.iter().filter(move |f| f.phase == phase)
    }
}

/// Result of the extraction phase
#[derive(Debug, Default)]
pub struct ItemHarvest {
    pub dataset: Dataset,
    pub failures: Vec<PageFailure>,
    pub skipped: usize,
}

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Config,
    session: Session,
    origin: Url,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Fails fast on an invalid configuration; nothing is fetched here.
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        validate(&config)?;

        // An explicit origin overrides the one derived from the listing
        let origin = match &config.harvest.site_origin {
            Some(origin) => site_origin(origin)?,
            None => site_origin(&config.harvest.base_url)?,
        };
        let session = Session::new(&config)?;

        Ok(Self {
            config,
            session,
            origin,
        })
    }

    /// Uses `cancel` to stop issuing new fetches
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.session = self.session.with_cancel(cancel);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Runs both phases and the normalization pass
    ///
    /// Page and item failures never abort the run; they are collected into
    /// the report next to whatever records could be extracted.
    pub async fn run(&self) -> Result<HarvestReport, HarvestError> {
        let start_time = Instant::now();

        // Phase one: collect item links from every index page
        let links = self.discover().await?;

        // Phase two: one record per link, in sorted link order
        let items = self.extract(&links.sorted_links()).await;

        // Counters are normalized once the whole dataset is in
        let mut dataset = items.dataset;
        tracing::info!("Normalizing {} records", dataset.len());
        let normalization_issues = normalize(&mut dataset);

        // Merge diagnostics from both phases
        let mut failures = links.failures;
        failures.extend(items.failures);

        let report = HarvestReport {
            links_discovered: links.links.len(),
            dataset,
            failures,
            soft_misses: links.soft_misses,
            normalization_issues,
            skipped: links.skipped + items.skipped,
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Harvest completed: {} records from {} links in {:?}",
            report.dataset.len(),
            report.links_discovered,
            report.elapsed
        );

        Ok(report)
    }

    /// Phase one: link discovery
    pub async fn discover(&self) -> Result<LinkHarvest, HarvestError> {
        discover_links(
            &self.session,
            &self.config.harvest.base_url,
            &self.origin,
            self.config.harvest.pages,
        )
        .await
    }

    /// Phase two: one record per link
    ///
    /// Records are appended in the order given by `links`, whatever order the
    /// fetches complete in.
    pub async fn extract(&self, links: &[String]) -> ItemHarvest {
        if links.is_empty() {
            tracing::info!("No item links found");
            return ItemHarvest::default();
        }

        tracing::info!("Getting data for {} items", links.len());

        let start_time = Instant::now();
        let session = &self.session;
        let mut results: Vec<Option<Record>> = vec![None; links.len()];
        let mut harvest = ItemHarvest::default();
        let mut items_done = 0usize;

        // Slots keep the input order whatever order fetches complete in
        let mut items = stream::iter(links.iter().enumerate())
            .map(|(index, link)| async move {
                // Nothing new is issued after cancellation
                if session.is_cancelled() {
                    return (index, None);
                }
                let result = extract_record(&session.client, &session.agents, link).await;
                (index, Some(result))
            })
            .buffer_unordered(session.concurrency);

        while let Some((index, result)) = items.next().await {
            match result {
                Some(Ok(record)) => results[index] = Some(record),
                Some(Err(e)) => {
                    tracing::warn!("Item skipped: {}", e);
                    harvest.failures.push(PageFailure::fetch(Phase::Extraction, e));
                }
                None => harvest.skipped += 1,
            }

            // Progress reporting every 10 items
            items_done += 1;
            if items_done % 10 == 0 {
                let rate = items_done as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {}/{} items, {:.2} items/sec",
                    items_done,
                    links.len(),
                    rate
                );
            }
        }

        // Failed and skipped slots stay empty
        harvest.dataset = results.into_iter().flatten().collect();
        tracing::info!("Data retrieval complete: {} records", harvest.dataset.len());

        harvest
    }
}
