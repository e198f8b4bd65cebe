//! Result sink traits and types
//!
//! This module defines the trait interface for result sinks and the summary
//! handed to them when a crawl ends.

use crate::output::stats::CrawlStatistics;
use crate::storage::{RunStatus, StorageError};
use crate::visit::VisitResult;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// What a sink is told when the crawl ends
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub start_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// True if the crawl was cancelled before it ran out of pages
    pub cancelled: bool,

    /// Hash of the configuration file, when one was loaded
    pub config_hash: Option<String>,

    pub stats: CrawlStatistics,
}

impl CrawlSummary {
    /// Starts a summary for a crawl beginning now
    pub fn new(start_url: impl Into<String>, config_hash: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            start_url: start_url.into(),
            started_at: now,
            finished_at: now,
            cancelled: false,
            config_hash,
            stats: CrawlStatistics::default(),
        }
    }

    /// Returns the wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds().max(0) as f64 / 1000.0
    }

    /// Returns the run status this summary corresponds to
    pub fn status(&self) -> RunStatus {
        if self.cancelled {
            RunStatus::Cancelled
        } else {
            RunStatus::Completed
        }
    }
}

/// Consumer of crawl results
///
/// A sink is fed every [`VisitResult`] in the order the stream yields them,
/// then either finished or aborted exactly once.
pub trait ResultSink: Send {
    /// Records one visit result
    fn record(&mut self, result: &VisitResult) -> OutputResult<()>;

    /// Performs any final writes
    fn finish(&mut self, summary: &CrawlSummary) -> OutputResult<()>;

    /// Closes the sink after a failed `record`
    ///
    /// The default does nothing.
    fn abort(&mut self, _summary: &CrawlSummary) -> OutputResult<()> {
        Ok(())
    }
}
