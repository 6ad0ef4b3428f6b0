//! Star-Sweep main entry point
//!
//! This is the command-line interface for the Star-Sweep repository harvester.

use clap::Parser;
use star_sweep::config::{load_config_with_hash, resolve_token};
use star_sweep::crawl::crawl;
use star_sweep::partition::StarWindows;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Star-Sweep: a GitHub repository metadata harvester
///
/// Star-Sweep walks the GitHub GraphQL search API in bounded star-count
/// windows and persists repository metadata idempotently into SQLite until a
/// target record count is reached.
#[derive(Parser, Debug)]
#[command(name = "star-sweep")]
#[command(version = "1.0.0")]
#[command(about = "A GitHub repository metadata harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the window plan without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("star_sweep=info,warn"),
            1 => EnvFilter::new("star_sweep=debug,info"),
            2 => EnvFilter::new("star_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the window plan
fn handle_dry_run(config: &star_sweep::config::Config) {
    println!("=== Star-Sweep Dry Run ===\n");

    println!("API:");
    println!("  Endpoint: {}", config.api.endpoint);
    println!("  Page size: {}", config.api.page_size);
    println!("  Token from: ${}", config.api.token_env);

    println!("\nPartition:");
    println!(
        "  Star range: {}..{} in windows of {}",
        config.partition.min_stars, config.partition.max_stars, config.partition.window_width
    );

    let windows = StarWindows::new(
        config.partition.min_stars,
        config.partition.max_stars,
        config.partition.window_width,
    );
    let count = windows.clone().count();
    println!("  Windows: {}", count);
    if let Some(first) = windows.clone().next() {
        println!("  First query: \"{}\"", first.search_qualifier());
    }
    if let Some(last) = windows.last() {
        println!("  Last query:  \"{}\"", last.search_qualifier());
    }

    println!("\nCrawl:");
    println!("  Target count: {}", config.crawl.target_count);
    println!("  Max page attempts: {}", config.crawl.max_page_attempts);
    println!(
        "  Backoff: {}s rate-limit, {}s transport",
        config.crawl.rate_limit_backoff_secs, config.crawl.transport_backoff_secs
    );

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &star_sweep::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    use star_sweep::storage::{SqliteStorage, Storage};
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    let total = storage.count_repos()?;
    println!("Repositories stored: {}", total);

    if let Some(run) = storage.get_latest_run()? {
        println!("\nLatest run: {}", run.id);
        println!("  Started: {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        println!("  Status: {}", run.status.to_db_string());
        println!("  Records persisted: {}", run.repos_inserted);

        let aborted = storage.list_aborted_windows(run.id)?;
        if aborted.is_empty() {
            println!("  Aborted windows: none");
        } else {
            println!("  Aborted windows ({}):", aborted.len());
            for window in aborted {
                println!(
                    "    [{}, {}) - {}",
                    window.min_stars, window.max_stars, window.reason
                );
            }
        }
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: star_sweep::config::Config,
    config_hash: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // Missing credentials are fatal before any crawl work starts
    let token = match resolve_token(&config.api.token_env) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    match crawl(config, &token, config_hash).await {
        Ok(summary) => {
            tracing::info!(
                "Done ({}). Total repositories persisted: {}",
                summary.outcome,
                summary.records_persisted
            );
            if summary.windows_aborted > 0 || summary.batches_dropped > 0 {
                tracing::warn!(
                    "{} windows aborted, {} batches dropped - re-run to fill gaps",
                    summary.windows_aborted,
                    summary.batches_dropped
                );
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
