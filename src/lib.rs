//! Star-Sweep: a GitHub repository metadata harvester
//!
//! This crate crawls repository metadata from the GitHub GraphQL search API by
//! walking bounded star-count windows, and persists the results idempotently
//! into SQLite until a configured target count is reached.

pub mod api;
pub mod config;
pub mod crawl;
pub mod partition;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Star-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API token not found in environment variable {0}")]
    MissingToken(String),
}

/// Result type alias for Star-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

// Re-export commonly used types
pub use api::RepoRecord;
pub use config::Config;
pub use crawl::{CrawlSummary, Orchestrator};
pub use partition::{StarWindow, StarWindows};
pub use state::{CrawlOutcome, WindowState};
