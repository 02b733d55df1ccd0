//! Output module for persisting datasets and reporting runs
//!
//! This module handles:
//! - Writing the finished dataset as a delimited text file
//! - Printing the end-of-run diagnostic report

mod csv_sink;
pub mod report;
mod traits;

pub use csv_sink::CsvSink;
pub use report::{print_report, RunSummary};
pub use traits::{DatasetSink, OutputError, OutputResult};
