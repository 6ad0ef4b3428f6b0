//! Crawl state tracking
//!
//! Defines the per-window state machine and the run-level outcome.

mod window_state;

pub use window_state::{CrawlOutcome, WindowState};
