//! End-of-run diagnostics
//!
//! Summarizes a [`HarvestReport`] and prints it to stdout. Failures are a
//! tally and a listing, never an error.

use crate::crawler::{HarvestReport, Phase};
use std::collections::BTreeMap;

/// Headline numbers of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub links_discovered: usize,
    pub records: usize,
    pub columns: usize,
    pub discovery_failures: usize,
    pub extraction_failures: usize,
    pub soft_misses: usize,
    pub normalization_drops: usize,
    pub skipped: usize,
    /// Failures grouped by HTTP status; `None` for timeouts and transport errors
    pub failures_by_status: BTreeMap<Option<u16>, usize>,
}

impl RunSummary {
    pub fn from_report(report: &HarvestReport) -> Self {
        let mut failures_by_status = BTreeMap::new();
        for failure in &report.failures {
            *failures_by_status.entry(failure.status()).or_insert(0) += 1;
        }

        let (records, columns) = report.dataset.shape();

        Self {
            links_discovered: report.links_discovered,
            records,
            columns,
            discovery_failures: report.failures_in(Phase::Discovery).count(),
            extraction_failures: report.failures_in(Phase::Extraction).count(),
            soft_misses: report.soft_misses.len(),
            normalization_drops: report.normalization_issues.len(),
            skipped: report.skipped,
            failures_by_status,
        }
    }

    /// One line per failure status, e.g. "HTTP 404: 3"
    ///
    /// Failures without a status (timeouts, transport errors) are grouped
    /// under "no response".
    pub fn status_tally(&self) -> Vec<String> {
        self.failures_by_status
            .iter()
            .map(|(status, count)| match status {
                Some(code) => format!("HTTP {}: {}", code, count),
                None => format!("no response: {}", count),
            })
            .collect()
    }

    /// Share of discovered links that became records, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.links_discovered == 0 {
            return 0.0;
        }
        (self.records as f64 / self.links_discovered as f64) * 100.0
    }
}

/// Prints the run report to stdout in a formatted manner
pub fn print_report(report: &HarvestReport) {
    let summary = RunSummary::from_report(report);

    println!("=== Harvest Report ===\n");

    println!("Overview:");
    println!("  Number of links retrieved: {}", summary.links_discovered);
    println!(
        "  Dataset shape: {} rows, {} columns",
        summary.records, summary.columns
    );
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    if summary.skipped > 0 {
        println!("  Skipped after cancellation: {}", summary.skipped);
    }
    println!();

    if !report.soft_misses.is_empty() {
        println!("Index pages without an item grid ({}):", summary.soft_misses);
        for url in &report.soft_misses {
            println!("  - {}", url);
        }
        println!();
    }

    // Tally first, then the per-phase listing
    let tally = summary.status_tally();
    if !tally.is_empty() {
        println!("Failures by status:");
        for line in &tally {
            println!("  {}", line);
        }
        println!();
    }

    for (phase, count) in [
        (Phase::Discovery, summary.discovery_failures),
        (Phase::Extraction, summary.extraction_failures),
    ] {
        if count == 0 {
            continue;
        }
        println!("Failures during {} ({}):", phase, count);
        for failure in report.failures_in(phase) {
            let status = failure
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  Link: {}, Status: {}, Cause: {}",
                failure.source_url, status, failure.cause
            );
        }
        println!();
    }

    if !report.normalization_issues.is_empty() {
        println!("Dropped counter values ({}):", summary.normalization_drops);
        for issue in &report.normalization_issues {
            println!("  - {}: {}", issue.url, issue.error);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} items extracted)",
        summary.success_rate(),
        summary.records,
        summary.links_discovered
    );
}
