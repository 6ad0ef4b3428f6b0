//! Bounded-attempt retry with backoff for single page fetches
//!
//! Every page request must resolve - success or error - within a bounded
//! attempt budget, so one persistently failing window can never stall the
//! crawl. Two backoff tiers:
//!
//! | Outcome | Action |
//! |---------|--------|
//! | Success | Return the page |
//! | 403/429 rate limit | Wait Retry-After (clamped to the cooldown) if given, else the cooldown, retry |
//! | 5xx / malformed 200 | Wait the rate-limit cooldown, retry |
//! | Transport failure | Wait the shorter transport cooldown, retry |
//! | Other 4xx | Abort immediately, retrying won't help |
//! | Attempts exhausted | Abort |
//!
//! An abort here becomes a window abort in the walker: the window is
//! abandoned and the crawl moves on.

use crate::api::{FetchOutcome, SearchClient, SearchPage};
use crate::config::CrawlConfig;
use std::fmt;
use std::time::Duration;

/// Terminal failure of a single page fetch; aborts the window
#[derive(Debug)]
pub enum PageError {
    /// The attempt budget was spent without a usable response
    AttemptsExhausted {
        attempts: u32,
        last_error: String,
    },

    /// The API rejected the request in a way retrying cannot fix
    Fatal { status: u16 },

    /// A page reported further results without a continuation cursor;
    /// continuing would re-fetch the same page forever
    MissingCursor,
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttemptsExhausted {
                attempts,
                last_error,
            } => write!(f, "gave up after {} attempts, last error: {}", attempts, last_error),
            Self::Fatal { status } => write!(f, "non-retryable HTTP {}", status),
            Self::MissingCursor => {
                write!(f, "page reported further results without a continuation cursor")
            }
        }
    }
}

/// Retry policy derived from the crawl configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per page, including the first
    pub max_attempts: u32,
    /// Cooldown after rate-limit/server errors without Retry-After guidance
    pub rate_limit_backoff: Duration,
    /// Cooldown after transport-level failures
    pub transport_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            max_attempts: config.max_page_attempts,
            rate_limit_backoff: Duration::from_secs(config.rate_limit_backoff_secs),
            transport_backoff: Duration::from_secs(config.transport_backoff_secs),
        }
    }
}

/// Picks the cooldown after a rate-limit response
///
/// Retry-After guidance may shorten the wait but never extend it past the
/// configured cooldown, so a single sleep stays bounded no matter what the
/// server sends.
fn rate_limit_delay(policy: &RetryPolicy, retry_after: Option<u64>) -> Duration {
    retry_after
        .map(|secs| Duration::from_secs(secs).min(policy.rate_limit_backoff))
        .unwrap_or(policy.rate_limit_backoff)
}

/// Fetches one page, retrying per the policy until it resolves
///
/// # Arguments
///
/// * `client` - The search client
/// * `qualifier` - Search filter string for the window being walked
/// * `cursor` - Continuation cursor, or None for the window's first page
/// * `policy` - Attempt budget and cooldown intervals
///
/// # Returns
///
/// * `Ok(SearchPage)` - A parsed page
/// * `Err(PageError)` - The fetch did not resolve; the window must be aborted
pub async fn fetch_page_with_retry(
    client: &SearchClient,
    qualifier: &str,
    cursor: Option<&str>,
    policy: &RetryPolicy,
) -> Result<SearchPage, PageError> {
    let mut last_error = String::new();

    for attempt in 1..=policy.max_attempts {
        let (backoff, description) = match client.fetch_page(qualifier, cursor).await {
            FetchOutcome::Success(page) => return Ok(page),

            FetchOutcome::RateLimited {
                status,
                retry_after,
            } => (
                rate_limit_delay(policy, retry_after),
                format!("rate limited (HTTP {})", status),
            ),

            FetchOutcome::ServerError { status } => (
                policy.rate_limit_backoff,
                format!("server error (HTTP {})", status),
            ),

            FetchOutcome::Malformed { reason } => (
                policy.rate_limit_backoff,
                format!("malformed response: {}", reason),
            ),

            FetchOutcome::Transport { reason } => (
                policy.transport_backoff,
                format!("transport error: {}", reason),
            ),

            FetchOutcome::ClientError { status } => {
                tracing::warn!("Query '{}' rejected with HTTP {}", qualifier, status);
                return Err(PageError::Fatal { status });
            }
        };

        last_error = description;
        if attempt < policy.max_attempts {
            tracing::warn!(
                "Attempt {}/{} for '{}' failed: {}. Retrying in {:?}",
                attempt,
                policy.max_attempts,
                qualifier,
                last_error,
                backoff
            );
            tokio::time::sleep(backoff).await;
        }
    }

    Err(PageError::AttemptsExhausted {
        attempts: policy.max_attempts,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;

    fn test_config() -> CrawlConfig {
        CrawlConfig {
            target_count: 100,
            max_page_attempts: 5,
            rate_limit_backoff_secs: 60,
            transport_backoff_secs: 30,
            batch_retry: true,
            progress_interval: 100,
        }
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from_config(&test_config());
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.rate_limit_backoff, Duration::from_secs(60));
        assert_eq!(policy.transport_backoff, Duration::from_secs(30));
    }

    #[test]
    fn test_page_error_display() {
        let err = PageError::AttemptsExhausted {
            attempts: 5,
            last_error: "rate limited (HTTP 429)".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("5 attempts"));
        assert!(message.contains("429"));

        assert_eq!(
            PageError::Fatal { status: 422 }.to_string(),
            "non-retryable HTTP 422"
        );
        assert!(PageError::MissingCursor.to_string().contains("cursor"));
    }

    #[test]
    fn test_retry_after_never_extends_the_cooldown() {
        let policy = RetryPolicy::from_config(&test_config());

        // No guidance: the configured cooldown
        assert_eq!(rate_limit_delay(&policy, None), Duration::from_secs(60));
        // Shorter guidance is honored
        assert_eq!(rate_limit_delay(&policy, Some(5)), Duration::from_secs(5));
        // An hour-long Retry-After is clamped to the configured cooldown
        assert_eq!(rate_limit_delay(&policy, Some(3600)), Duration::from_secs(60));
    }

    // The attempt bound and backoff selection are exercised against a live
    // wiremock server in tests/crawl_tests.rs.
}
