//! HTTP client and single-page fetch with response classification
//!
//! One call = one GraphQL search request for one page of one star window.
//! The raw HTTP response is classified into a [`FetchOutcome`] so the retry
//! layer can decide what to do without touching reqwest types.

use crate::api::types::{GraphQlResponse, SearchPage};
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

/// GraphQL query for repository search with cursor pagination
const SEARCH_QUERY: &str = r#"
query($cursor: String, $query: String!, $pageSize: Int!) {
  search(query: $query, type: REPOSITORY, first: $pageSize, after: $cursor) {
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      ... on Repository {
        id
        name
        stargazerCount
        owner { login }
      }
    }
  }
}
"#;

/// Classified result of a single page fetch
///
/// | Response | Outcome |
/// |----------|---------|
/// | 200, well-formed payload | `Success` |
/// | 403 / 429 | `RateLimited` (Retry-After honored when present) |
/// | 5xx | `ServerError` |
/// | other 4xx | `ClientError` (non-retryable) |
/// | connect/timeout/body failure | `Transport` |
/// | 200 with unparsable or error payload | `Malformed` |
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched and parsed a page
    Success(SearchPage),

    /// Rate-limited by the API
    RateLimited {
        status: u16,
        /// Cooldown guidance from the Retry-After header, in seconds
        retry_after: Option<u64>,
    },

    /// Server-side error, worth retrying
    ServerError { status: u16 },

    /// Caller error (malformed query, bad credentials); retrying won't help
    ClientError { status: u16 },

    /// Transport-level failure (connection error, timeout)
    Transport { reason: String },

    /// HTTP 200 but the payload could not be used
    Malformed { reason: String },
}

/// Builds the HTTP client used for all API requests
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("star-sweep/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the repository search endpoint
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: String,
    token: String,
    page_size: u32,
}

impl SearchClient {
    /// Creates a new search client
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client (see [`build_http_client`])
    /// * `endpoint` - GraphQL endpoint URL
    /// * `token` - Bearer token presented on every request
    /// * `page_size` - Records per page (capped at 100 by the API)
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
            page_size,
        }
    }

    /// Fetches one page of search results and classifies the response
    ///
    /// # Arguments
    ///
    /// * `qualifier` - Search filter string, e.g. `"stars:100..299"`
    /// * `cursor` - Continuation cursor from the previous page, or None for
    ///   the first page of a window
    pub async fn fetch_page(&self, qualifier: &str, cursor: Option<&str>) -> FetchOutcome {
        let body = json!({
            "query": SEARCH_QUERY,
            "variables": {
                "cursor": cursor,
                "query": qualifier,
                "pageSize": self.page_size,
            }
        });

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&body);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    "connection error".to_string()
                } else {
                    e.to_string()
                };
                return FetchOutcome::Transport { reason };
            }
        };

        let status = response.status();

        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(&response);
            return FetchOutcome::RateLimited {
                status: status.as_u16(),
                retry_after,
            };
        }

        if status.is_server_error() {
            return FetchOutcome::ServerError {
                status: status.as_u16(),
            };
        }

        if status.is_client_error() {
            return FetchOutcome::ClientError {
                status: status.as_u16(),
            };
        }

        if !status.is_success() {
            return FetchOutcome::Malformed {
                reason: format!("unexpected status {}", status),
            };
        }

        let parsed: GraphQlResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                return FetchOutcome::Malformed {
                    reason: format!("invalid JSON payload: {}", e),
                }
            }
        };

        if !parsed.errors.is_empty() {
            // GraphQL-level errors arrive with HTTP 200; treat them like a
            // transient server fault and let the retry layer decide.
            return FetchOutcome::Malformed {
                reason: format!("GraphQL errors: {}", parsed.errors[0].message),
            };
        }

        match parsed.data.and_then(|d| d.search) {
            Some(search) => FetchOutcome::Success(search.into_page()),
            None => FetchOutcome::Malformed {
                reason: "response missing data.search".to_string(),
            },
        }
    }
}

/// Extracts Retry-After cooldown guidance in seconds, if present
fn parse_retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
