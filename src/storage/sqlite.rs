//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::api::RepoRecord;
use crate::partition::StarWindow;
use crate::state::CrawlOutcome;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{AbortedWindowRecord, RunRecord, RunStatus};
use crate::SweepError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SweepError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SweepError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database, useful for tests and fake-store setups
    pub fn new_in_memory() -> Result<Self, SweepError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn run_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRecord> {
        Ok(RunRecord {
            id: row.get(0)?,
            started_at: row.get(1)?,
            finished_at: row.get(2)?,
            config_hash: row.get(3)?,
            status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                .unwrap_or(RunStatus::Running),
            repos_inserted: row.get::<_, i64>(5)? as u64,
        })
    }
}

impl Storage for SqliteStorage {
    // ===== Result Sink =====

    fn insert_repos(&mut self, repos: &[RepoRecord]) -> StorageResult<usize> {
        // One transaction per batch: commit-or-rollback, never partially
        // applied. Dropping the transaction on an early return rolls back.
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO repositories (repo_id, name, owner, stars)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for repo in repos {
                inserted += stmt.execute(params![repo.id, repo.name, repo.owner, repo.stars])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn count_repos(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM repositories", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn repo_exists(&self, repo_id: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM repositories WHERE repo_id = ?1",
                params![repo_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status, repos_inserted
                 FROM runs WHERE id = ?1",
                params![run_id],
                Self::run_from_row,
            )
            .optional()?
            .ok_or(crate::storage::StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status, repos_inserted
                 FROM runs ORDER BY id DESC LIMIT 1",
                [],
                Self::run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        outcome: CrawlOutcome,
        repos_inserted: u64,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, repos_inserted = ?3 WHERE id = ?4",
            params![
                RunStatus::from(outcome).to_db_string(),
                now,
                repos_inserted as i64,
                run_id
            ],
        )?;
        Ok(())
    }

    // ===== Aborted-Window Tracking =====

    fn record_aborted_window(
        &mut self,
        run_id: i64,
        window: StarWindow,
        reason: &str,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO aborted_windows (run_id, min_stars, max_stars, reason, aborted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![run_id, window.min as i64, window.max as i64, reason, now],
        )?;
        Ok(())
    }

    fn list_aborted_windows(&self, run_id: i64) -> StorageResult<Vec<AbortedWindowRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, min_stars, max_stars, reason, aborted_at
             FROM aborted_windows WHERE run_id = ?1 ORDER BY min_stars ASC",
        )?;

        let windows = stmt
            .query_map(params![run_id], |row| {
                Ok(AbortedWindowRecord {
                    run_id: row.get(0)?,
                    min_stars: row.get::<_, i64>(1)? as u64,
                    max_stars: row.get::<_, i64>(2)? as u64,
                    reason: row.get(3)?,
                    aborted_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(windows)
    }
}
