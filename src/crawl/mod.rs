//! Crawl engine
//!
//! This module contains the crawl-and-persist core:
//! - Bounded-attempt retry with backoff around single page fetches
//! - Cursor pagination walking within one star window
//! - The orchestrator that sequences windows, deduplicates records, drives
//!   the sink, and decides termination

mod orchestrator;
mod retry;
mod walker;

pub use orchestrator::{CrawlSummary, Orchestrator};
pub use retry::{fetch_page_with_retry, PageError, RetryPolicy};
pub use walker::{WalkStep, WindowWalker};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// Opens the configured database, creates a run, and drives windows until the
/// target count is reached or every window is exhausted.
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `token` - API bearer token
/// * `config_hash` - Hash of the configuration file, recorded on the run row
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed (target reached or windows exhausted)
/// * `Err(SweepError)` - Setup or bookkeeping failure
pub async fn crawl(config: Config, token: &str, config_hash: &str) -> Result<CrawlSummary> {
    let orchestrator = Orchestrator::new(config, token, config_hash)?;
    orchestrator.run().await
}
