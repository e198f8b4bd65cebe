//! Output module for writing crawl results
//!
//! This module handles:
//! - Streaming results as JSON lines or a JSON array
//! - Recording results to a SQLite database
//! - Generating a markdown site map
//! - Aggregating crawl statistics
//! - Driving a crawl stream into a sink

mod json;
mod markdown;
mod sqlite_output;
pub mod stats;
mod traits;

pub use json::{JsonArraySink, JsonLinesSink};
pub use markdown::{format_markdown_report, MarkdownSink};
pub use sqlite_output::SqliteSink;
pub use stats::{log_statistics, CrawlStatistics};
pub use traits::{CrawlSummary, OutputError, OutputResult, ResultSink};

use crate::config::{OutputConfig, OutputFormat};
use crate::crawler::CrawlStream;
use chrono::Utc;
use std::io::{self, BufWriter};
use std::path::Path;

/// Builds the sink selected by the output configuration
///
/// JSON formats write to stdout. The SQLite sink opens its database and
/// starts a run immediately, so a bad database path fails before crawling.
pub fn build_sink(
    config: &OutputConfig,
    start_url: &str,
    config_hash: Option<&str>,
) -> OutputResult<Box<dyn ResultSink>> {
    let sink: Box<dyn ResultSink> = match config.format {
        OutputFormat::JsonLines => Box::new(JsonLinesSink::new(BufWriter::new(io::stdout()))),
        OutputFormat::Json => Box::new(JsonArraySink::new(BufWriter::new(io::stdout()))),
        OutputFormat::Sqlite => Box::new(SqliteSink::open(
            Path::new(&config.database_path),
            start_url,
            config_hash,
        )?),
        OutputFormat::Markdown => Box::new(MarkdownSink::new(&config.summary_path)),
    };
    Ok(sink)
}

/// Streams every result of a crawl into `sink` and closes the sink
///
/// `summary` carries what is known before the crawl; statistics, the finish
/// time and the cancellation flag are filled in here. If the sink fails to
/// record a result, the crawl is cancelled, the sink is aborted and the
/// record error is returned once the workers have stopped.
pub async fn write_crawl(
    mut stream: CrawlStream,
    sink: &mut dyn ResultSink,
    mut summary: CrawlSummary,
) -> OutputResult<CrawlSummary> {
    while let Some(result) = stream.next().await {
        summary.stats.record(&result);

        if let Err(e) = sink.record(&result) {
            tracing::error!("Failed to write result for {}: {}", result.page(), e);
            stream.cancel();
            stream.finish().await;

            summary.cancelled = true;
            summary.finished_at = Utc::now();
            if let Err(abort_err) = sink.abort(&summary) {
                tracing::error!("Failed to close output: {}", abort_err);
            }
            return Err(e);
        }
    }

    summary.cancelled = stream.is_cancelled();
    stream.finish().await;
    summary.finished_at = Utc::now();
    sink.finish(&summary)?;
    Ok(summary)
}
