//! Cursor pagination within one star window
//!
//! A walker owns the pagination cursor for exactly one window. The cursor
//! starts empty, is replaced after every fetched page, and is discarded when
//! the API reports no further pages. Cursors are opaque and scoped to their
//! window; a walker is never reused across windows, and an aborted window is
//! abandoned rather than resumed with a stale cursor.

use crate::api::{RepoRecord, SearchClient};
use crate::crawl::retry::{fetch_page_with_retry, PageError, RetryPolicy};
use crate::partition::StarWindow;

/// One step of walking a window's result stream
#[derive(Debug)]
pub enum WalkStep {
    /// A page of records was fetched; more steps may follow
    Page(Vec<RepoRecord>),

    /// The window's result stream is complete
    Exhausted,

    /// A page fetch failed terminally; the window is abandoned
    Aborted(PageError),
}

/// Walks one window's pages until exhaustion or abort
///
/// Owns a handle to the search client (cloning it is cheap) so the caller
/// stays free to mutate its own state between steps.
pub struct WindowWalker<'a> {
    client: SearchClient,
    policy: &'a RetryPolicy,
    qualifier: String,
    cursor: Option<String>,
    finished: bool,
}

impl<'a> WindowWalker<'a> {
    /// Creates a walker positioned at the start of the given window
    pub fn new(client: SearchClient, policy: &'a RetryPolicy, window: StarWindow) -> Self {
        Self {
            client,
            policy,
            qualifier: window.search_qualifier(),
            cursor: None,
            finished: false,
        }
    }

    /// Fetches the next page and advances the cursor
    ///
    /// After `Exhausted` or `Aborted` has been returned, every further call
    /// returns `Exhausted`; the walker never rewinds.
    pub async fn next_step(&mut self) -> WalkStep {
        if self.finished {
            return WalkStep::Exhausted;
        }

        let page =
            match fetch_page_with_retry(&self.client, &self.qualifier, self.cursor.as_deref(), self.policy)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    self.finished = true;
                    return WalkStep::Aborted(e);
                }
            };

        tracing::trace!(
            "Fetched page for {}: {} records, has_next_page={}",
            self.qualifier,
            page.repos.len(),
            page.has_next_page
        );

        if page.has_next_page {
            match page.end_cursor {
                Some(cursor) => self.cursor = Some(cursor),
                None => {
                    // More pages claimed but nothing to continue from:
                    // advancing would re-fetch the first page forever.
                    self.finished = true;
                    return WalkStep::Aborted(PageError::MissingCursor);
                }
            }
        } else {
            self.finished = true;
            self.cursor = None;
        }

        WalkStep::Page(page.repos)
    }
}

// Walker behavior (cursor advance, exhaustion, abort-and-abandon) is covered
// end-to-end against a wiremock server in tests/crawl_tests.rs.
