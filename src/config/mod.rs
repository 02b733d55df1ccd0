//! Configuration module for Catalog-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every value has a default except the listing URL and page count, which may
//! also be supplied on the command line.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Will walk {} index pages", config.harvest.pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_user_agents, Config, HarvestConfig, OutputConfig, UserAgentConfig,
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_REQUEST_TIMEOUT_MS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
