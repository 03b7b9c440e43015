//! Site-Text main entry point
//!
//! This is the command-line interface for the Site-Text batch scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sitetext::config::{
    load_scraper_config, validate_output_name, Config, RunTarget, ScraperConfig,
    DEFAULT_OUTPUT_NAME, DEFAULT_WORK_LIST,
};
use sitetext::load_work_list;
use sitetext::output::write_results;
use sitetext::scrape::run_scrape;
use tracing_subscriber::EnvFilter;

/// Site-Text: a batch web content extractor
///
/// Site-Text downloads every URL in a JSON work list, extracts the readable
/// text of HTML pages and PDF documents, and writes one text file per URL.
/// The succeeded entries are printed to stdout as JSON.
#[derive(Parser, Debug)]
#[command(name = "sitetext")]
#[command(version = "1.0.0")]
#[command(about = "A batch web content extractor", long_about = None)]
struct Cli {
    /// Use the test output directory and test.json work list
    #[arg(long = "test_run")]
    test_run: bool,

    /// Output subdirectory under the scraped directory
    #[arg(long, default_value = DEFAULT_OUTPUT_NAME)]
    output: String,

    /// Path to the JSON work list
    #[arg(long, default_value = DEFAULT_WORK_LIST)]
    spider: PathBuf,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and work list and show what would be scraped
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_scrape(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the JSON result.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitetext=info,warn"),
            1 => EnvFilter::new("sitetext=debug,info"),
            2 => EnvFilter::new("sitetext=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves the command line and optional config file into one `Config`
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let scraper = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_scraper_config(path)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => ScraperConfig::default(),
    };

    let target = if cli.test_run {
        RunTarget::Test
    } else {
        validate_output_name(&cli.output)?;
        RunTarget::Named {
            output: cli.output.clone(),
            work_list: cli.spider.clone(),
        }
    };

    Ok(Config::new(scraper, target))
}

/// Handles the --dry-run mode: validates inputs and shows what would be scraped
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Site-Text Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Workers: {}", config.scraper.workers);
    println!("  Timeout: {}s", config.scraper.timeout_secs);
    println!("  Connect timeout: {}s", config.scraper.connect_timeout_secs);
    println!("  User agent: {}", config.scraper.user_agent);

    println!("\nOutput:");
    println!("  Directory: {}", config.output_dir.display());
    println!(
        "  Existing output: {}",
        if config.output_dir.exists() {
            "would be archived and cleared"
        } else {
            "none"
        }
    );

    let items = load_work_list(&config.work_list)
        .with_context(|| format!("invalid work list {}", config.work_list.display()))?;

    println!("\nWork List: {} ({} items)", config.work_list.display(), items.len());
    for item in &items {
        println!("  - {}", item.url());
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} URLs", items.len());

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {} into {} with {} workers",
        config.work_list.display(),
        config.output_dir.display(),
        config.scraper.workers
    );

    let report = match run_scrape(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    if let Some(archive) = &report.archive {
        tracing::info!("Previous output archived to {}", archive.display());
    }

    let stdout = std::io::stdout();
    write_results(&mut stdout.lock(), &report.items).context("failed to write results")?;

    Ok(())
}
