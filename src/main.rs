//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the Catalog-Harvest scraper.

use anyhow::Context;
use catalog_harvest::config::{load_config_with_hash, validate, Config};
use catalog_harvest::crawler::harvest;
use catalog_harvest::output::{print_report, CsvSink, DatasetSink};
use catalog_harvest::url::index_page_urls;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a two-phase catalog scraper
///
/// Walks the pages of a paginated listing to discover item links, extracts a
/// fixed set of fields from every item page, and writes them as a table.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A two-phase catalog scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Listing URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Number of index pages to walk (overrides the config file)
    #[arg(long, value_name = "N")]
    pages: Option<u32>,

    /// Dataset output path (overrides the config file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Maximum number of requests in flight (overrides the config file)
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show which pages would be fetched without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    // Dry run stops after validation
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file, if any, applies command-line overrides and validates
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    // Start from the file when given, otherwise from defaults
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    // Command-line flags win over the file
    if let Some(base_url) = &cli.base_url {
        config.harvest.base_url = base_url.clone();
    }
    if let Some(pages) = cli.pages {
        config.harvest.pages = pages;
    }
    if let Some(output) = &cli.output {
        config.output.dataset_path = output.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.harvest.max_concurrent_requests = concurrency;
    }

    // Validate once, after overrides
    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Harvest Configuration:");
    println!("  Base URL: {}", config.harvest.base_url);
    println!("  Pages: {}", config.harvest.pages);
    if let Some(origin) = &config.harvest.site_origin {
        println!("  Site origin: {}", origin);
    }
    println!(
        "  Max concurrent requests: {}",
        config.harvest.max_concurrent_requests
    );
    println!("  Request timeout: {}ms", config.harvest.request_timeout_ms);
    println!("  Connect timeout: {}ms", config.harvest.connect_timeout_ms);

    println!("\nUser Agents ({}):", config.user_agent.pool.len());
    for agent in &config.user_agent.pool {
        println!("  - {}", agent);
    }

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path);
    println!("  Delimiter: {:?}", config.output.delimiter);

    // Show exactly which index pages a real run would request
    let page_urls = index_page_urls(&config.harvest.base_url, config.harvest.pages)?;
    println!("\nIndex Pages ({}):", page_urls.len());
    for url in &page_urls {
        println!("  * {}", url);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    let sink = CsvSink::from_config(&config.output);

    // Ctrl-C stops new fetches; in-flight ones finish
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted; finishing in-flight requests");
            interrupt.cancel();
        }
    });

    let report = harvest(config, cancel).await?;

    // Report first so failure diagnostics survive a failed write
    print_report(&report);

    sink.write(&report.dataset)
        .with_context(|| format!("failed to write {}", sink.path().display()))?;

    Ok(())
}
