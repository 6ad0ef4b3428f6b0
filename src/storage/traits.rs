//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::api::RepoRecord;
use crate::partition::StarWindow;
use crate::state::CrawlOutcome;
use crate::storage::{AbortedWindowRecord, RunRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The orchestrator owns a single storage handle and drives it from one
/// sequential path, so implementations need no internal locking.
pub trait Storage {
    // ===== Result Sink =====

    /// Persists a batch of repository records idempotently
    ///
    /// The whole batch is applied in one transaction: either every row is
    /// committed or, on failure, none are (the transaction rolls back and the
    /// error is surfaced so the caller can retry or drop the batch). A record
    /// whose `repo_id` already exists is a silent no-op.
    ///
    /// # Returns
    ///
    /// The number of rows actually inserted (existing ids don't count).
    fn insert_repos(&mut self, repos: &[RepoRecord]) -> StorageResult<usize>;

    /// Counts all persisted repositories
    fn count_repos(&self) -> StorageResult<u64>;

    /// Returns true if a repository with this external id is already stored
    fn repo_exists(&self, repo_id: &str) -> StorageResult<bool>;

    // ===== Run Management =====

    /// Creates a new crawl run in `running` status
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run finished with its outcome and final insert count
    fn finish_run(
        &mut self,
        run_id: i64,
        outcome: CrawlOutcome,
        repos_inserted: u64,
    ) -> StorageResult<()>;

    // ===== Aborted-Window Tracking =====

    /// Records a window abandoned during this run, with the abort reason
    fn record_aborted_window(
        &mut self,
        run_id: i64,
        window: StarWindow,
        reason: &str,
    ) -> StorageResult<()>;

    /// Lists the windows abandoned during a run
    fn list_aborted_windows(&self, run_id: i64) -> StorageResult<Vec<AbortedWindowRecord>>;
}
