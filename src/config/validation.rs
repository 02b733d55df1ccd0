use crate::config::types::{Config, HarvestConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent fetches
const MAX_CONCURRENT_REQUESTS: usize = 64;

/// Lower bound on both timeouts, in milliseconds
const MIN_TIMEOUT_MS: u64 = 100;

/// Validates the entire configuration
///
/// Runs before any network activity; a failure here is the only fatal
/// outcome of a harvest.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvest_config(&config.harvest)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates listing and request settings
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    if config.base_url.is_empty() {
        return Err(ConfigError::Validation(
            "base_url is required (config file or --base-url)".to_string(),
        ));
    }
    validate_http_url("base_url", &config.base_url)?;

    // Optional override; derived from base_url when absent

    if let Some(origin) = &config.site_origin {
        validate_http_url("site_origin", origin)?;
    }

    // Validate pages
    if config.pages < 1 {
        return Err(ConfigError::Validation(format!(
            "pages must be a positive integer, got {}",
            config.pages
        )));
    }

    // Validate concurrency
    if !(1..=MAX_CONCURRENT_REQUESTS).contains(&config.max_concurrent_requests) {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and {}, got {}",
            MAX_CONCURRENT_REQUESTS, config.max_concurrent_requests
        )));
    }

    // Validate timeouts
    if config.request_timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "request_timeout_ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.request_timeout_ms
        )));
    }

    if config.connect_timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.connect_timeout_ms
        )));
    }

    Ok(())
}

/// Validates the identity pool
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.pool.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent pool cannot be empty".to_string(),
        ));
    }

    if config.pool.iter().any(|agent| agent.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user-agent pool cannot contain blank entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dataset_path.is_empty() {
        return Err(ConfigError::Validation(
            "dataset_path cannot be empty".to_string(),
        ));
    }

    // csv wants a single byte
    if config.delimiter.len() != 1 || !config.delimiter.is_ascii() {
        return Err(ConfigError::Validation(format!(
            "delimiter must be a single ASCII character, got '{}'",
            config.delimiter
        )));
    }

    Ok(())
}

/// Checks that `value` is an absolute http(s) URL with a host
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            name, value
        )));
    }

    Ok(())
}
