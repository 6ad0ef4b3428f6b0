//! Storage module for Star-Sweep
//!
//! This module handles all persistence: the repositories table the crawl
//! fills, plus run bookkeeping so an operator can see what a run inserted and
//! which windows it had to abandon.

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::state::CrawlOutcome;

/// Status of a crawl run as recorded in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Run is in progress (or was interrupted mid-run)
    Running,
    /// Run finished because the target count was reached
    TargetReached,
    /// Run finished after visiting every window
    WindowsExhausted,
}

impl RunStatus {
    /// Converts the status to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::TargetReached => "target_reached",
            Self::WindowsExhausted => "windows_exhausted",
        }
    }

    /// Parses a status from a database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "target_reached" => Some(Self::TargetReached),
            "windows_exhausted" => Some(Self::WindowsExhausted),
            _ => None,
        }
    }
}

impl From<CrawlOutcome> for RunStatus {
    fn from(outcome: CrawlOutcome) -> Self {
        match outcome {
            CrawlOutcome::TargetReached => Self::TargetReached,
            CrawlOutcome::WindowsExhausted => Self::WindowsExhausted,
        }
    }
}

/// A row from the runs table
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub repos_inserted: u64,
}

/// A row from the aborted_windows table
#[derive(Debug, Clone)]
pub struct AbortedWindowRecord {
    pub run_id: i64,
    pub min_stars: u64,
    pub max_stars: u64,
    pub reason: String,
    pub aborted_at: String,
}
