//! Configuration module for Star-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus resolving the API bearer token from the environment.
//!
//! # Example
//!
//! ```no_run
//! use star_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Target count: {}", config.crawl.target_count);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, CrawlConfig, OutputConfig, PartitionConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, resolve_token};
