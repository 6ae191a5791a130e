//! UniScrape main entry point
//!
//! Command-line interface selecting one of the four run modes.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use uniscrape::config::{resolve_config, Secrets};
use uniscrape::output::print_summary;
use uniscrape::pipeline::{ensure_progress, ModeFlags};
use uniscrape::Pipeline;

/// UniScrape: collects documents for retrieval-augmented generation
///
/// Scrapes seed URLs, extracts PDFs, or crawls outward from the seeds while
/// respecting robots.txt and per-host delays. Exactly one mode must be given.
#[derive(Parser, Debug)]
#[command(name = "uniscrape")]
#[command(version)]
#[command(about = "A polite scraper and crawler for RAG data ingestion", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults to ./uniscrape.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fetch and extract every seed URL
    #[arg(long)]
    scrape: bool,

    /// Extract local PDFs and PDF seed URLs
    #[arg(long)]
    pdf: bool,

    /// Discover URLs from the seeds without extracting
    #[arg(long)]
    crawl: bool,

    /// Discover URLs from the seeds and extract every page reached
    #[arg(long = "crawl_and_scrape")]
    crawl_and_scrape: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn mode_flags(&self) -> ModeFlags {
        ModeFlags {
            scrape: self.scrape,
            pdf: self.pdf,
            crawl: self.crawl,
            crawl_and_scrape: self.crawl_and_scrape,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mode = match cli.mode_flags().resolve() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("error: {}\n", e);
            eprintln!("{}", Cli::command().render_usage());
            std::process::exit(2);
        }
    };

    let (config, config_hash) =
        resolve_config(cli.config.as_deref()).context("Failed to load configuration")?;

    let _guard = setup_logging(cli.verbose, cli.quiet, &config.paths.log_file)?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    // After logging, so a broken .env is reported
    let secrets = Secrets::load();
    tracing::debug!("Secrets: {:?}", secrets);

    let pipeline = Pipeline::new(config, secrets, config_hash);
    let summary = match pipeline.run(mode).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("{} run failed: {}", mode, e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_summary(&summary);
    }
    ensure_progress(&summary)?;

    Ok(())
}

/// Sets up console logging from the verbosity flags plus the run log file
///
/// `RUST_LOG` overrides the console filter. The file always records at info
/// level or above. The returned guard flushes the file writer on drop.
fn setup_logging(verbose: u8, quiet: bool, log_file: &Path) -> anyhow::Result<WorkerGuard> {
    let console_filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
            0 => EnvFilter::new("uniscrape=info,warn"),
            1 => EnvFilter::new("uniscrape=debug,info"),
            2 => EnvFilter::new("uniscrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        })
    };

    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(console_filter);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new("uniscrape=info,warn"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
