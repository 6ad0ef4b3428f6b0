//! GitHub GraphQL search API client
//!
//! This module contains everything that talks to the remote search endpoint:
//! - Building an HTTP client carrying the bearer token
//! - Constructing the repository search query with a star-range qualifier
//!   and pagination cursor
//! - Deserializing response pages and classifying failures

mod client;
mod types;

pub use client::{build_http_client, FetchOutcome, SearchClient};
pub use types::{RepoRecord, SearchPage};
