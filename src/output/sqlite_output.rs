//! SQLite-based result sink
//!
//! This module provides a sink that records every visit result of a crawl
//! run to the storage backend.

use crate::output::traits::{CrawlSummary, OutputResult, ResultSink};
use crate::storage::{RunStatus, SqliteStorage, Storage};
use crate::visit::VisitResult;
use std::path::Path;

/// SQLite-based result sink
///
/// The run row is created when the sink is opened and completed when the
/// sink is finished.
pub struct SqliteSink<S: Storage + Send = SqliteStorage> {
    storage: S,
    run_id: i64,
}

impl SqliteSink<SqliteStorage> {
    /// Opens (or creates) the database at `path` and starts a run
    pub fn open(path: &Path, start_url: &str, config_hash: Option<&str>) -> OutputResult<Self> {
        let storage = SqliteStorage::new(path)?;
        Self::new(storage, start_url, config_hash)
    }
}

impl<S: Storage + Send> SqliteSink<S> {
    /// Starts a run on an existing storage backend
    pub fn new(mut storage: S, start_url: &str, config_hash: Option<&str>) -> OutputResult<Self> {
        let run_id = storage.create_run(start_url, config_hash)?;
        tracing::debug!("Recording crawl as run {}", run_id);
        Ok(Self { storage, run_id })
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: Storage + Send> ResultSink for SqliteSink<S> {
    fn record(&mut self, result: &VisitResult) -> OutputResult<()> {
        match result {
            VisitResult::Success(visit) => {
                let links: Vec<&str> = visit.links.iter().map(|l| l.as_str()).collect();
                self.storage
                    .record_visit(self.run_id, visit.page.as_str(), &links)?;
            }
            VisitResult::Failure(failure) => {
                self.storage.record_failure(
                    self.run_id,
                    failure.page.as_str(),
                    &failure.error.to_string(),
                )?;
            }
        }
        Ok(())
    }

    fn finish(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        self.storage.complete_run(self.run_id, summary.status())?;
        tracing::info!(
            "Recorded run {} ({} pages)",
            self.run_id,
            self.storage.count_pages(self.run_id)?
        );
        Ok(())
    }

    fn abort(&mut self, _summary: &CrawlSummary) -> OutputResult<()> {
        self.storage.complete_run(self.run_id, RunStatus::Failed)?;
        tracing::warn!("Marked run {} as failed", self.run_id);
        Ok(())
    }
}
