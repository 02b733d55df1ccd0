//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building an HTTP client with connect and request timeouts
//! - Picking a client identity at random for every request
//! - GET requests returning the raw page content
//! - Error classification into [`FetchCause`]
//!
//! There is no retry at this layer. A non-2xx answer or a timeout is returned
//! as a [`FetchError`] and the caller decides what it means.

use crate::config::{HarvestConfig, UserAgentConfig};
use crate::url::parse_http_url;
use crate::{FetchCause, FetchError};
use rand::seq::SliceRandom;
use reqwest::header::USER_AGENT;
use reqwest::Client;

/// A fixed pool of client identity strings
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Creates a pool from the configured identities
    pub fn new(config: &UserAgentConfig) -> Self {
        Self {
            agents: config.pool.clone(),
        }
    }

    /// Picks one identity uniformly at random
    ///
    /// Returns None only for an empty pool, which validation rules out.
    pub fn pick(&self) -> Option<&str> {
        self.agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Builds an HTTP client with proper configuration
///
/// No default user agent is set; every request carries one from the pool.
/// Cookies are not persisted between requests.
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::HarvestConfig;
/// use catalog_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HarvestConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HarvestConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its raw content
///
/// # Error Classification
///
/// | Condition | Cause |
/// |-----------|-------|
/// | URL not absolute http(s) | `InvalidUrl` (no request sent) |
/// | Non-2xx status | `Status(code)` |
/// | Client timeout | `Timeout` |
/// | Connection refused / TLS | `Connect` |
/// | Body read failure | `Body` |
/// | Anything else | `Network` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `agents` - Identity pool; one entry is sent as `User-Agent`
/// * `url` - The URL to fetch
pub async fn fetch_url(
    client: &Client,
    agents: &UserAgentPool,
    url: &str,
) -> Result<String, FetchError> {
    let fail = |cause: FetchCause| FetchError {
        url: url.to_string(),
        cause,
    };

    // Reject before sending anything
    let parsed = parse_http_url(url).map_err(|e| fail(FetchCause::InvalidUrl(e.to_string())))?;

    // Fresh identity per request
    let mut request = client.get(parsed);
    if let Some(agent) = agents.pick() {
        request = request.header(USER_AGENT, agent);
    }

    let response = request.send().await.map_err(|e| fail(classify(&e)))?;

    // Check status code
    let status = response.status();
    if !status.is_success() {
        tracing::debug!("GET {} returned {}", url, status);
        return Err(fail(FetchCause::Status(status.as_u16())));
    }

    // Read body
    response.text().await.map_err(|e| {
        if e.is_timeout() {
            fail(FetchCause::Timeout)
        } else {
            fail(FetchCause::Body(e.to_string()))
        }
    })
}

/// Maps a transport error onto a failure cause
fn classify(error: &reqwest::Error) -> FetchCause {
    if error.is_timeout() {
        FetchCause::Timeout
    } else if error.is_connect() {
        FetchCause::Connect(error.to_string())
    } else {
        FetchCause::Network(error.to_string())
    }
}
