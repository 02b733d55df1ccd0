//! Diagnostic records for pages and items that could not be harvested

use crate::{FetchCause, FetchError};
use std::fmt;

/// Which pipeline phase a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Walking the index pages
    Discovery,
    /// Visiting item-detail pages
    Extraction,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery => f.write_str("discovery"),
            Self::Extraction => f.write_str("extraction"),
        }
    }
}

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The page could not be fetched
    Fetch(FetchCause),
    /// The page loaded but its structure could not be read
    Extraction(String),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(cause) => write!(f, "{}", cause),
            Self::Extraction(reason) => write!(f, "extraction error: {}", reason),
        }
    }
}

/// A recorded, non-fatal failure for one page or item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub source_url: String,
    pub phase: Phase,
    pub cause: FailureCause,
}

impl PageFailure {
    pub fn fetch(phase: Phase, error: FetchError) -> Self {
        Self {
            source_url: error.url,
            phase,
            cause: FailureCause::Fetch(error.cause),
        }
    }

    pub fn extraction(
        phase: Phase,
        source_url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            phase,
            cause: FailureCause::Extraction(reason.into()),
        }
    }

    /// HTTP status of the failure
    ///
    /// Extraction failures happen on pages that loaded, so they report 200.
    pub fn status(&self) -> Option<u16> {
        match &self.cause {
            FailureCause::Fetch(cause) => cause.status(),
            FailureCause::Extraction(_) => Some(200),
        }
    }
}

impl fmt::Display for PageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.source_url, self.phase, self.cause)
    }
}
