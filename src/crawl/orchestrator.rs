//! Crawl orchestration - the top-level driver
//!
//! The orchestrator owns every piece of mutable crawl state: the storage
//! handle, the in-memory seen-id set, and the progress counter. One
//! sequential path drives it all, so there is no locking anywhere.
//!
//! Windows are visited in ascending star order, each walked to exhaustion
//! (or abort) before the next begins. A rerun after a crash therefore
//! re-visits the lowest windows first and relies on the sink's idempotent
//! upsert to make re-processing safe.

use crate::api::{build_http_client, RepoRecord, SearchClient};
use crate::config::Config;
use crate::crawl::retry::RetryPolicy;
use crate::crawl::walker::{WalkStep, WindowWalker};
use crate::partition::{StarWindow, StarWindows};
use crate::state::{CrawlOutcome, WindowState};
use crate::storage::{SqliteStorage, Storage};
use crate::Result;
use std::collections::HashSet;
use std::path::Path;

/// Final accounting of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Why the run stopped
    pub outcome: CrawlOutcome,
    /// Records confirmed persisted during this run
    pub records_persisted: u64,
    /// Windows started
    pub windows_visited: u64,
    /// Windows abandoned after retry exhaustion or a non-retryable error
    pub windows_aborted: u64,
    /// Batches dropped after a failed persist and failed retry (data loss
    /// visible to the operator)
    pub batches_dropped: u64,
}

/// Top-level crawl driver
pub struct Orchestrator {
    config: Config,
    client: SearchClient,
    storage: SqliteStorage,
    run_id: i64,
    /// Identifiers already submitted to the sink this run. Invariant: an id
    /// in this set has had its persistence attempt resolved.
    seen_ids: HashSet<String>,
    /// Records confirmed persisted this run; sole input to termination
    progress: u64,
}

impl Orchestrator {
    /// Creates an orchestrator backed by the configured database file
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    /// * `token` - API bearer token
    /// * `config_hash` - Hash of the config file, recorded on the run row
    pub fn new(config: Config, token: &str, config_hash: &str) -> Result<Self> {
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        Self::with_storage(config, token, config_hash, storage)
    }

    /// Creates an orchestrator over an explicit storage handle
    ///
    /// Useful for tests that want an in-memory database.
    pub fn with_storage(
        config: Config,
        token: &str,
        config_hash: &str,
        mut storage: SqliteStorage,
    ) -> Result<Self> {
        let http = build_http_client()?;
        let client = SearchClient::new(
            http,
            config.api.endpoint.clone(),
            token,
            config.api.page_size,
        );
        let run_id = storage.create_run(config_hash)?;

        Ok(Self {
            config,
            client,
            storage,
            run_id,
            seen_ids: HashSet::new(),
            progress: 0,
        })
    }

    /// Runs the crawl to completion
    ///
    /// Stops as soon as the progress counter reaches the target: the current
    /// window is not continued and no further window is started. One aborted
    /// window never halts the run.
    pub async fn run(mut self) -> Result<CrawlSummary> {
        let target = self.config.crawl.target_count;
        let policy = RetryPolicy::from_config(&self.config.crawl);
        let windows = StarWindows::new(
            self.config.partition.min_stars,
            self.config.partition.max_stars,
            self.config.partition.window_width,
        );

        tracing::info!(
            "Starting run {}: target {} records, stars {}..{} in windows of {}",
            self.run_id,
            target,
            self.config.partition.min_stars,
            self.config.partition.max_stars,
            self.config.partition.window_width
        );

        let start_time = std::time::Instant::now();
        let mut windows_visited = 0u64;
        let mut windows_aborted = 0u64;
        let mut batches_dropped = 0u64;

        'windows: for window in windows {
            if self.progress >= target {
                break;
            }

            windows_visited += 1;
            let mut state = WindowState::Pending;
            let mut walker = WindowWalker::new(self.client.clone(), &policy, window);
            tracing::debug!("Window {} {}", window, state);

            loop {
                state = WindowState::Fetching;
                tracing::trace!("Window {} {}", window, state);
                match walker.next_step().await {
                    WalkStep::Page(records) => {
                        let batch = self.dedup_and_trim(records, target);
                        if !batch.is_empty() && !self.persist_batch(&batch)? {
                            batches_dropped += 1;
                        }
                        state = WindowState::PageDone;
                        tracing::trace!("Window {} {}", window, state);

                        if self.progress >= target {
                            tracing::debug!("Window {} stopped at target", window);
                            break 'windows;
                        }
                    }

                    WalkStep::Exhausted => {
                        state = WindowState::Exhausted;
                        tracing::debug!("Window {} {}", window, state);
                        break;
                    }

                    WalkStep::Aborted(e) => {
                        state = WindowState::Aborted;
                        windows_aborted += 1;
                        tracing::warn!("Window {} {}: {}", window, state, e);
                        self.record_abort(window, &e.to_string())?;
                        break;
                    }
                }
            }
        }

        let outcome = if self.progress >= target {
            CrawlOutcome::TargetReached
        } else {
            CrawlOutcome::WindowsExhausted
        };

        self.storage.finish_run(self.run_id, outcome, self.progress)?;

        tracing::info!(
            "Run {} finished ({}) in {:?}: {} records persisted, {} windows visited, {} aborted, {} batches dropped",
            self.run_id,
            outcome,
            start_time.elapsed(),
            self.progress,
            windows_visited,
            windows_aborted,
            batches_dropped
        );

        Ok(CrawlSummary {
            outcome,
            records_persisted: self.progress,
            windows_visited,
            windows_aborted,
            batches_dropped,
        })
    }

    /// Drops already-seen identifiers and trims the batch so the progress
    /// counter lands exactly on the target
    ///
    /// Overlapping windows and API-level result drift can surface the same
    /// identifier twice; anything in the seen-id set has already had its
    /// persistence attempt resolved and is skipped. Duplicates within the
    /// page itself are collapsed too.
    fn dedup_and_trim(&self, records: Vec<RepoRecord>, target: u64) -> Vec<RepoRecord> {
        let remaining = (target - self.progress) as usize;
        let mut in_page = HashSet::new();

        records
            .into_iter()
            .filter(|r| !self.seen_ids.contains(&r.id) && in_page.insert(r.id.clone()))
            .take(remaining)
            .collect()
    }

    /// Persists one batch, retrying once on failure before dropping it
    ///
    /// Only a confirmed commit advances the progress counter and the seen-id
    /// set. Returns false if the batch was dropped after the retry also
    /// failed - a visible loss path, kept small by page-sized batches.
    fn persist_batch(&mut self, batch: &[RepoRecord]) -> Result<bool> {
        let mut attempt = self.storage.insert_repos(batch);

        if let Err(e) = &attempt {
            tracing::warn!("Batch insert of {} records failed: {}", batch.len(), e);
            if self.config.crawl.batch_retry {
                attempt = self.storage.insert_repos(batch);
            }
        }

        match attempt {
            Ok(newly_inserted) => {
                for record in batch {
                    self.seen_ids.insert(record.id.clone());
                }
                let before = self.progress;
                self.progress += batch.len() as u64;

                let interval = self.config.crawl.progress_interval;
                if self.progress / interval > before / interval {
                    tracing::info!(
                        "Persisted {} records ({} new rows in last batch)",
                        self.progress,
                        newly_inserted
                    );
                }
                Ok(true)
            }
            Err(e) => {
                tracing::error!(
                    "Dropping batch of {} records after failed retry: {}",
                    batch.len(),
                    e
                );
                Ok(false)
            }
        }
    }

    /// Records an abandoned window so operators can identify and re-run gaps
    fn record_abort(&mut self, window: StarWindow, reason: &str) -> Result<()> {
        self.storage
            .record_aborted_window(self.run_id, window, reason)?;
        Ok(())
    }
}
