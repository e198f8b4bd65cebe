//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{LinkRecord, PageRecord, RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Page already recorded for run {run_id}: {url}")]
    DuplicatePage { run_id: i64, url: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Each crawl is a run; every visit result of the run becomes one page row,
/// and every link on a successfully visited page becomes one link row.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run and returns its ID
    fn create_run(&mut self, start_url: &str, config_hash: Option<&str>) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as finished with the given status
    fn complete_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Visit Recording =====

    /// Records a successfully visited page and the links found on it
    ///
    /// Returns the page ID.
    fn record_visit(&mut self, run_id: i64, url: &str, links: &[&str]) -> StorageResult<i64>;

    /// Records a page that could not be visited
    ///
    /// Returns the page ID.
    fn record_failure(&mut self, run_id: i64, url: &str, error: &str) -> StorageResult<i64>;

    // ===== Queries =====

    /// Gets a page of a run by URL
    fn get_page_by_url(&self, run_id: i64, url: &str) -> StorageResult<Option<PageRecord>>;

    /// Gets the links found on a page, in document order
    fn get_outgoing_links(&self, page_id: i64) -> StorageResult<Vec<LinkRecord>>;

    /// Counts pages recorded for a run
    fn count_pages(&self, run_id: i64) -> StorageResult<u64>;

    /// Counts pages of a run that could not be visited
    fn count_failed_pages(&self, run_id: i64) -> StorageResult<u64>;

    /// Counts links recorded for a run
    fn count_links(&self, run_id: i64) -> StorageResult<u64>;
}
