//! Catalog-Harvest: a two-phase catalog scraper
//!
//! This crate discovers item-detail links across the pages of a paginated
//! listing, extracts a fixed schema of fields from every detail page, and
//! normalizes compact popularity counters before handing the dataset off to
//! a tabular sink.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use std::fmt;
use thiserror::Error;

/// Main error type for Catalog-Harvest operations
///
/// Only process-fatal conditions surface as a `HarvestError`. Page, item and
/// field failures are accumulated into the run report instead.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Why a single fetch did not produce content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCause {
    /// The server answered with a non-2xx status
    Status(u16),
    /// The request exceeded the client timeout
    Timeout,
    /// Connection could not be established
    Connect(String),
    /// Any other transport failure
    Network(String),
    /// The response body could not be read
    Body(String),
    /// The URL was not a well-formed absolute URL
    InvalidUrl(String),
}

impl FetchCause {
    /// Returns the HTTP status code, if the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for FetchCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Timeout => write!(f, "request timeout"),
            Self::Connect(e) => write!(f, "connection failed: {}", e),
            Self::Network(e) => write!(f, "network error: {}", e),
            Self::Body(e) => write!(f, "failed to read body: {}", e),
            Self::InvalidUrl(e) => write!(f, "invalid URL: {}", e),
        }
    }
}

/// A failed fetch. Never fatal: the caller decides whether it matters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Fetch failed for {url}: {cause}")]
pub struct FetchError {
    pub url: String,
    pub cause: FetchCause,
}

/// A single field whose rule found no match or a malformed match
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Field '{field}' not extracted: {reason}")]
pub struct ExtractionMiss {
    pub field: &'static str,
    pub reason: String,
}

/// A count-like value that could not be coerced to an integer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Cannot normalize {field} value '{raw_value}'")]
pub struct NormalizationError {
    pub field: &'static str,
    pub raw_value: String,
}

/// Result type alias for Catalog-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{harvest, Dataset, HarvestReport, PageFailure, Record};
