use serde::Deserialize;

/// Main configuration structure for Star-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub partition: PartitionConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
}

/// Remote search API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// GraphQL endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Records requested per page (the API caps this at 100)
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Name of the environment variable holding the bearer token
    #[serde(rename = "token-env", default = "default_token_env")]
    pub token_env: String,
}

/// Star-range partitioning configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PartitionConfig {
    /// Lower bound of the star range to cover (inclusive)
    #[serde(rename = "min-stars")]
    pub min_stars: u64,

    /// Upper bound of the star range to cover (exclusive)
    #[serde(rename = "max-stars")]
    pub max_stars: u64,

    /// Width of each query window; must keep any single window's result
    /// count below the API's maximum fetchable total
    #[serde(rename = "window-width")]
    pub window_width: u64,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Stop once this many records have been persisted in the run
    #[serde(rename = "target-count")]
    pub target_count: u64,

    /// Maximum fetch attempts for a single page before the window is aborted
    #[serde(rename = "max-page-attempts", default = "default_max_page_attempts")]
    pub max_page_attempts: u32,

    /// Cooldown after a rate-limit or server-error response (seconds),
    /// used when the API gives no Retry-After guidance
    #[serde(
        rename = "rate-limit-backoff-secs",
        default = "default_rate_limit_backoff"
    )]
    pub rate_limit_backoff_secs: u64,

    /// Cooldown after a transport-level failure (seconds)
    #[serde(
        rename = "transport-backoff-secs",
        default = "default_transport_backoff"
    )]
    pub transport_backoff_secs: u64,

    /// Whether a failed sink batch is retried once before being dropped
    #[serde(rename = "batch-retry", default = "default_batch_retry")]
    pub batch_retry: bool,

    /// Emit a progress log every this many confirmed inserts
    #[serde(rename = "progress-interval", default = "default_progress_interval")]
    pub progress_interval: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_endpoint() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_max_page_attempts() -> u32 {
    5
}

fn default_rate_limit_backoff() -> u64 {
    60
}

fn default_transport_backoff() -> u64 {
    30
}

fn default_batch_retry() -> bool {
    true
}

fn default_progress_interval() -> u64 {
    100
}
