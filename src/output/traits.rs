//! Dataset sink trait and errors

use crate::crawler::Dataset;
use crate::HarvestError;
use thiserror::Error;

/// Errors that can occur while persisting a dataset
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<OutputError> for HarvestError {
    fn from(error: OutputError) -> Self {
        match error {
            OutputError::Csv(e) => HarvestError::Csv(e),
            OutputError::Io(e) => HarvestError::Io(e),
        }
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for dataset sinks
///
/// A sink receives the finished, normalized dataset exactly once per run and
/// owns everything about where and how it is stored.
pub trait DatasetSink {
    /// Persists the dataset
    ///
    /// # Arguments
    ///
    /// * `dataset` - The normalized records, in output order
    fn write(&self, dataset: &Dataset) -> OutputResult<()>;
}
