//! Sitewalk main entry point
//!
//! This is the command-line interface for the Sitewalk site mapper.

use anyhow::{Context, Result};
use clap::Parser;
use sitewalk::config::{load_config_with_hash, validate, Config, OutputFormat};
use sitewalk::crawler::{check_start_link, crawl};
use sitewalk::output::{build_sink, log_statistics, write_crawl, CrawlStatistics, CrawlSummary};
use sitewalk::{Link, ScopePolicy};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sitewalk: a concurrent site mapper
///
/// Sitewalk visits every page reachable from START_URL on the same host,
/// once each, and reports the links found on every page.
#[derive(Parser, Debug)]
#[command(name = "sitewalk")]
#[command(version)]
#[command(about = "A concurrent site mapper", long_about = None)]
struct Cli {
    /// Absolute http(s) URL to start crawling from
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// SQLite database path (sqlite format)
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Markdown report path (markdown format)
    #[arg(long, value_name = "PATH")]
    summary: Option<String>,

    /// Validate configuration and starting URL without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(workers) = self.workers {
            config.crawler.workers = workers;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(database) = &self.database {
            config.output.database_path = database.clone();
        }
        if let Some(summary) = &self.summary {
            config.output.summary_path = summary.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    let start = Link::parse(&cli.start_url)
        .with_context(|| format!("Invalid start URL '{}'", cli.start_url))?;
    check_start_link(&start).with_context(|| format!("Cannot crawl '{}'", start))?;

    if cli.dry_run {
        log_plan(&config, &start);
        tracing::info!("Configuration is valid, not crawling (--dry-run)");
        return Ok(());
    }

    let mut sink = build_sink(&config.output, start.as_str(), config_hash.as_deref())
        .context("Failed to open output")?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    log_plan(&config, &start);
    let mut summary = CrawlSummary::new(start.as_str(), config_hash);
    summary.stats =
        CrawlStatistics::with_scope(ScopePolicy::new(&config.crawler.excluded_extensions));
    let stream = crawl(&config, start, cancel).context("Failed to start crawl")?;

    let summary = write_crawl(stream, sink.as_mut(), summary)
        .await
        .context("Failed to write results")?;

    log_statistics(&summary.stats);
    if summary.cancelled {
        tracing::warn!("Crawl was interrupted; results are partial");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitewalk=info,warn"),
            1 => EnvFilter::new("sitewalk=debug,info"),
            _ => EnvFilter::new("sitewalk=trace,debug"),
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

fn log_plan(config: &Config, start: &Link) {
    tracing::info!(
        "Crawling {} with {} workers, {} requests/s (0 = unlimited), {}s timeout",
        start,
        config.crawler.workers,
        config.http.requests_per_second,
        config.http.timeout_secs
    );
    tracing::info!(
        "Excluded extensions: {}",
        config.crawler.excluded_extensions.join(", ")
    );
    if let Some(max_pages) = config.crawler.max_pages {
        tracing::info!("Stopping after {} pages", max_pages);
    }
    tracing::info!("Output: {:?}", config.output.format);
}

/// Cancels the crawl on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            cancel.cancel();
        }
    });
}
