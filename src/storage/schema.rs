//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Star-Sweep database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Harvested repository metadata, keyed by the API's stable identifier.
-- Inserts are conflict-ignoring: a repo_id seen in a previous run or an
-- overlapping window is a silent no-op.
CREATE TABLE IF NOT EXISTS repositories (
    repo_id TEXT PRIMARY KEY,
    name    TEXT NOT NULL,
    owner   TEXT NOT NULL,
    stars   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_repositories_stars ON repositories(stars);
CREATE INDEX IF NOT EXISTS idx_repositories_owner ON repositories(owner);

-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    repos_inserted INTEGER NOT NULL DEFAULT 0
);

-- Windows abandoned after retry exhaustion or a non-retryable API error.
-- These are the gaps an operator re-runs to fill.
CREATE TABLE IF NOT EXISTS aborted_windows (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    min_stars INTEGER NOT NULL,
    max_stars INTEGER NOT NULL,
    reason TEXT NOT NULL,
    aborted_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_aborted_windows_run ON aborted_windows(run_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Initialize twice
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["repositories", "runs", "aborted_windows"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }
}
