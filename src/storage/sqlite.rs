//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{LinkRecord, PageRecord, RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// The database file is created if it does not exist.
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn insert_page(
        &mut self,
        run_id: i64,
        url: &str,
        error_message: Option<&str>,
        links: &[&str],
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO pages (run_id, url, visited_at, error_message) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, url, now, error_message],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(ref failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                StorageError::DuplicatePage {
                    run_id,
                    url: url.to_string(),
                }
            }
            other => StorageError::Sqlite(other),
        })?;
        let page_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO links (run_id, from_page_id, to_url, position) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (position, to_url) in links.iter().enumerate() {
                stmt.execute(params![run_id, page_id, to_url, position as i64])?;
            }
        }

        tx.commit()?;
        Ok(page_id)
    }

    fn count(&self, sql: &str, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, params![run_id], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        start_url: row.get(3)?,
        config_hash: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?).unwrap_or(RunStatus::Failed),
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, start_url: &str, config_hash: Option<&str>) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, start_url, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![now, start_url, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, start_url, config_hash, status
                 FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, start_url, config_hash, status
                 FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn complete_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Visit Recording =====

    fn record_visit(&mut self, run_id: i64, url: &str, links: &[&str]) -> StorageResult<i64> {
        self.insert_page(run_id, url, None, links)
    }

    fn record_failure(&mut self, run_id: i64, url: &str, error: &str) -> StorageResult<i64> {
        self.insert_page(run_id, url, Some(error), &[])
    }

    // ===== Queries =====

    fn get_page_by_url(&self, run_id: i64, url: &str) -> StorageResult<Option<PageRecord>> {
        let page = self
            .conn
            .query_row(
                "SELECT id, run_id, url, visited_at, error_message
                 FROM pages WHERE run_id = ?1 AND url = ?2",
                params![run_id, url],
                |row| {
                    Ok(PageRecord {
                        id: row.get(0)?,
                        run_id: row.get(1)?,
                        url: row.get(2)?,
                        visited_at: row.get(3)?,
                        error_message: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(page)
    }

    fn get_outgoing_links(&self, page_id: i64) -> StorageResult<Vec<LinkRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT from_page_id, to_url, position FROM links
             WHERE from_page_id = ?1 ORDER BY position",
        )?;

        let links = stmt
            .query_map(params![page_id], |row| {
                Ok(LinkRecord {
                    from_page_id: row.get(0)?,
                    to_url: row.get(1)?,
                    position: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn count_pages(&self, run_id: i64) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM pages WHERE run_id = ?1", run_id)
    }

    fn count_failed_pages(&self, run_id: i64) -> StorageResult<u64> {
        self.count(
            "SELECT COUNT(*) FROM pages WHERE run_id = ?1 AND error_message IS NOT NULL",
            run_id,
        )
    }

    fn count_links(&self, run_id: i64) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM links WHERE run_id = ?1", run_id)
    }
}
