//! Delimited-text dataset sink

use crate::config::OutputConfig;
use crate::crawler::{Dataset, Record};
use crate::output::traits::{DatasetSink, OutputResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes a dataset as a delimited text file: one header row, one row per record
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.dataset_path, config.delimiter_byte())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSink for CsvSink {
    fn write(&self, dataset: &Dataset) -> OutputResult<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        // Header row, then records in dataset order
        writer.write_record(Record::COLUMNS)?;
        for record in dataset.records() {
            writer.write_record(record.to_row())?;
        }
        writer.flush()?;

        tracing::info!(
            "Wrote {} records to {}",
            dataset.len(),
            self.path.display()
        );
        Ok(())
    }
}
