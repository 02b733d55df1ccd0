//! Shared request state for one harvest run

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, UserAgentPool};
use crate::HarvestError;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

/// Everything a phase needs to issue requests
///
/// Cloning is cheap: the client and the cancellation token are both handles
/// onto shared state.
#[derive(Debug, Clone)]
pub struct Session {
    pub client: Client,
    pub agents: UserAgentPool,
    /// Maximum number of fetches in flight
    pub concurrency: usize,
    pub cancel: CancellationToken,
}

impl Session {
    /// Builds the HTTP client and identity pool from a validated config
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let agents = UserAgentPool::new(&config.user_agent);
        let concurrency = config.harvest.max_concurrent_requests.max(1);
        tracing::debug!(
            "Session: {} user agents, {} requests in flight",
            agents.len(),
            concurrency
        );

        Ok(Self {
            client: build_http_client(&config.harvest)?,
            agents,
            concurrency,
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the cancellation token, e.g. with one wired to Ctrl-C
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Whether new fetches should still be issued
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
