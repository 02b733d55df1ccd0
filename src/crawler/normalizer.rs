//! Compact-count normalization
//!
//! Popularity counters arrive as text in compact suffix notation ("12.5K")
//! or as plain integers ("340"). Normalization turns every such field into
//! an integer count.
//!
//! # Policy
//!
//! A value that cannot be coerced is dropped to null and reported as a
//! [`NormalizationError`]; the record itself is kept. Nulls stay null and
//! already-normalized values pass through untouched, so normalizing twice
//! is the same as normalizing once.

use crate::crawler::record::{Count, Dataset, Record};
use crate::NormalizationError;

/// Multiplier for the `K` suffix
const THOUSAND: f64 = 1000.0;

/// A normalization failure together with the record it happened in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationIssue {
    pub url: String,
    pub error: NormalizationError,
}

/// Parses one compact-notation count
///
/// # Examples
///
/// ```
/// use catalog_harvest::crawler::parse_compact_count;
///
/// assert_eq!(parse_compact_count("12.5K"), Some(12_500));
/// assert_eq!(parse_compact_count("340"), Some(340));
/// assert_eq!(parse_compact_count("--"), None);
/// ```
pub fn parse_compact_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();

    // Compact notation, e.g. "12.5K"
    if let Some(mantissa) = raw.strip_suffix('K') {
        let value: f64 = mantissa.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let scaled = (value * THOUSAND).round();
        if scaled > u64::MAX as f64 {
            return None;
        }
        return Some(scaled as u64);
    }

    // Plain integer
    raw.parse().ok()
}

/// Normalizes a single count field in place
pub fn normalize_count(
    field: &'static str,
    count: &mut Option<Count>,
) -> Result<(), NormalizationError> {
    // Nulls and normalized values pass through
    let Some(Count::Raw(raw)) = count.as_ref() else {
        return Ok(());
    };

    match parse_compact_count(raw) {
        Some(value) => {
            *count = Some(Count::Value(value));
            Ok(())
        }
        None => {
            let error = NormalizationError {
                field,
                raw_value: raw.clone(),
            };
            *count = None;
            Err(error)
        }
    }
}

/// Normalizes the six count fields of one record
pub fn normalize_record(record: &mut Record) -> Vec<NormalizationError> {
    record
        .count_fields_mut()
        .into_iter()
        .filter_map(|(field, count)| normalize_count(field, count).err())
        .collect()
}

/// Normalizes every record of a dataset in place
///
/// Returns the values that had to be dropped.
pub fn normalize(dataset: &mut Dataset) -> Vec<NormalizationIssue> {
    let mut issues = Vec::new();

    for record in dataset.records_mut() {
        for error in normalize_record(record) {
            tracing::debug!("{}: {}", record.url, error);
            issues.push(NormalizationIssue {
                url: record.url.clone(),
                error,
            });
        }
    }

    issues
}
