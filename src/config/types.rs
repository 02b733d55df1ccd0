use serde::Deserialize;
use std::time::Duration;

/// Default number of requests in flight at once
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 4;

/// Default upper bound for a whole request, in milliseconds
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default upper bound for establishing a connection, in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.5060.66 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:53.0) Gecko/20100101 Firefox/53.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/51.0.2704.79 Safari/537.36 Edge/14.14393",
];

/// Returns the built-in pool of browser identity strings
pub fn default_user_agents() -> Vec<String> {
    BROWSER_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}

/// Main configuration structure for Catalog-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Listing and request behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HarvestConfig {
    /// Listing URL; the page query parameter is appended to it
    #[serde(default)]
    pub base_url: String,

    /// Number of index pages to walk, starting from page 1
    #[serde(default)]
    pub pages: u32,

    /// Origin prefixed to relative item links. Derived from `base_url` when absent.
    #[serde(default)]
    pub site_origin: Option<String>,

    /// Maximum number of fetches in flight
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Upper bound for a whole request (milliseconds)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Upper bound for establishing a connection (milliseconds)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            pages: 0,
            site_origin: None,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl HarvestConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Client identity rotation
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Identity strings; one is picked at random for every request
    #[serde(default = "default_user_agents")]
    pub pool: Vec<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            pool: default_user_agents(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the delimited dataset file
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,

    /// Field delimiter, a single ASCII character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            delimiter: default_delimiter(),
        }
    }
}

impl OutputConfig {
    /// The delimiter as a byte. Validation guarantees a single ASCII char.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

fn default_max_concurrent_requests() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_dataset_path() -> String {
    "./dataset.csv".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}
