//! Window state definitions for tracking crawl progress
//!
//! Each star window moves through a small state machine:
//! `Pending -> Fetching -> (PageDone -> Fetching)* -> Exhausted | Aborted`.
//! Both end states are terminal; an aborted window is never re-entered.

use std::fmt;

/// Represents the current state of one star window in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowState {
    /// Window has not been started yet
    Pending,

    /// A page fetch for this window is in flight
    Fetching,

    /// A page was fetched and persisted; more pages remain
    PageDone,

    /// Pagination reported no further pages; window is complete
    Exhausted,

    /// Retry attempts for a page were exhausted or a non-retryable error
    /// occurred; window was abandoned
    Aborted,
}

impl WindowState {
    /// Returns true if this is a terminal state (window will not be touched again)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Aborted)
    }

    /// Returns true if this window completed normally
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Converts the window state to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::PageDone => "page_done",
            Self::Exhausted => "exhausted",
            Self::Aborted => "aborted",
        }
    }

    /// Parses a window state from a database string representation
    ///
    /// Returns None if the string doesn't match any known state.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "fetching" => Some(Self::Fetching),
            "page_done" => Some(Self::PageDone),
            "exhausted" => Some(Self::Exhausted),
            "aborted" => Some(Self::Aborted),
            _ => None,
        }
    }

    /// Returns all possible window states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::PageDone,
            Self::Exhausted,
            Self::Aborted,
        ]
    }
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Terminal outcome of a whole crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The progress counter reached the configured target
    TargetReached,

    /// Every window was visited before the target was reached
    WindowsExhausted,
}

impl CrawlOutcome {
    /// Converts the outcome to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::TargetReached => "target_reached",
            Self::WindowsExhausted => "windows_exhausted",
        }
    }

    /// Parses an outcome from a database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "target_reached" => Some(Self::TargetReached),
            "windows_exhausted" => Some(Self::WindowsExhausted),
            _ => None,
        }
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!WindowState::Pending.is_terminal());
        assert!(!WindowState::Fetching.is_terminal());
        assert!(!WindowState::PageDone.is_terminal());

        assert!(WindowState::Exhausted.is_terminal());
        assert!(WindowState::Aborted.is_terminal());
    }

    #[test]
    fn test_is_success() {
        assert!(WindowState::Exhausted.is_success());
        assert!(!WindowState::Aborted.is_success());
        assert!(!WindowState::Fetching.is_success());
    }

    #[test]
    fn test_roundtrip_db_string() {
        for state in WindowState::all_states() {
            let db_str = state.to_db_string();
            let parsed = WindowState::from_db_string(db_str);
            assert_eq!(Some(state), parsed, "Failed roundtrip for {:?}", state);
        }
        assert_eq!(WindowState::from_db_string("invalid"), None);
    }

    #[test]
    fn test_outcome_roundtrip() {
        for outcome in [CrawlOutcome::TargetReached, CrawlOutcome::WindowsExhausted] {
            assert_eq!(
                CrawlOutcome::from_db_string(outcome.to_db_string()),
                Some(outcome)
            );
        }
        assert_eq!(CrawlOutcome::from_db_string("invalid"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", WindowState::Aborted), "aborted");
        assert_eq!(format!("{}", CrawlOutcome::TargetReached), "target_reached");
    }
}
