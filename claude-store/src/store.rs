//! SQLite-backed interaction log.
//!
//! Two append-only tables:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS interactions (
//!     id          INTEGER PRIMARY KEY AUTOINCREMENT,
//!     timestamp   TEXT NOT NULL,
//!     query       TEXT NOT NULL,
//!     response    TEXT NOT NULL,
//!     context     TEXT,
//!     tokens_used INTEGER NOT NULL DEFAULT 0
//! );
//! CREATE TABLE IF NOT EXISTS code_reviews (
//!     id          INTEGER PRIMARY KEY AUTOINCREMENT,
//!     timestamp   TEXT NOT NULL,
//!     file_path   TEXT NOT NULL,
//!     issues      TEXT NOT NULL,
//!     suggestions TEXT NOT NULL,
//!     score       INTEGER
//! );
//! ```
//!
//! Timestamps are stored as RFC 3339 UTC strings so SQLite's date functions
//! can group by calendar day. Volumes are assumed small (single-user, local
//! use); a table scan is the only index this needs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{CodeReviewRecord, DailySummary, InteractionRecord};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS interactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp   TEXT NOT NULL,
    query       TEXT NOT NULL,
    response    TEXT NOT NULL,
    context     TEXT,
    tokens_used INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS code_reviews (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp   TEXT NOT NULL,
    file_path   TEXT NOT NULL,
    issues      TEXT NOT NULL,
    suggestions TEXT NOT NULL,
    score       INTEGER
);";

/// Handle to an open interaction log.
pub struct InteractionStore {
    conn: Connection,
    db_path: PathBuf,
}

impl std::fmt::Debug for InteractionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl InteractionStore {
    /// Open (or create) the log database at `path`.
    ///
    /// The schema is created if it does not exist; re-opening an existing
    /// database is a no-op for the schema and loses no data.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&db_path, flags)?;

        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        info!(path = %db_path.display(), "interaction log opened");

        Ok(Self { conn, db_path })
    }

    /// Open an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Database`] on SQLite failures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            db_path: PathBuf::from(":memory:"),
        })
    }

    /// Path to the database file (or `:memory:`).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    // ------------------------------------------------------------------
    // Appends
    // ------------------------------------------------------------------

    /// Append one interaction record. Returns the new row id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Database`] when the write fails.
    pub fn record_interaction(
        &self,
        query: &str,
        response: &str,
        context: Option<&str>,
        tokens_used: i64,
    ) -> Result<i64> {
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO interactions (timestamp, query, response, context, tokens_used)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![now, query, response, context, tokens_used],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, tokens_used, "interaction recorded");
        Ok(id)
    }

    /// Append one code-review record. Returns the new row id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Database`] when the write fails.
    pub fn record_code_review(
        &self,
        file_path: &str,
        analysis: &str,
        suggestions: &str,
        score: Option<i64>,
    ) -> Result<i64> {
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO code_reviews (timestamp, file_path, issues, suggestions, score)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![now, file_path, analysis, suggestions, score],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, file_path, "code review recorded");
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Retrieval
    // ------------------------------------------------------------------

    /// The most recent interactions whose query contains `substring`,
    /// newest first, at most `limit`.
    ///
    /// The match is a case-sensitive substring test (`instr`, not `LIKE` —
    /// SQLite's `LIKE` is case-insensitive for ASCII).
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Database`] on SQLite failures.
    pub fn find_related(&self, substring: &str, limit: usize) -> Result<Vec<InteractionRecord>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, timestamp, query, response, context, tokens_used
             FROM interactions
             WHERE instr(query, ?1) > 0
             ORDER BY timestamp DESC, id DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![substring, limit as i64], |row| {
            Ok(InteractionRecord {
                id: row.get(0)?,
                timestamp: parse_timestamp(row.get::<_, String>(1)?.as_str(), 1)?,
                query: row.get(2)?,
                response: row.get(3)?,
                context: row.get(4)?,
                tokens_used: row.get(5)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// All code reviews for a file path, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Database`] on SQLite failures.
    pub fn reviews_for(&self, file_path: &str) -> Result<Vec<CodeReviewRecord>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, timestamp, file_path, issues, suggestions, score
             FROM code_reviews
             WHERE file_path = ?1
             ORDER BY timestamp DESC, id DESC",
        )?;

        let rows = stmt.query_map(params![file_path], |row| {
            Ok(CodeReviewRecord {
                id: row.get(0)?,
                timestamp: parse_timestamp(row.get::<_, String>(1)?.as_str(), 1)?,
                file_path: row.get(2)?,
                issues: row.get(3)?,
                suggestions: row.get(4)?,
                score: row.get(5)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Aggregate counts and the most recent queries for `date`.
    ///
    /// A day with no activity reports zero counts and an empty query list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Database`] on SQLite failures.
    pub fn summarize(&self, date: NaiveDate) -> Result<DailySummary> {
        let day = date.format("%Y-%m-%d").to_string();

        let (interactions, tokens_used): (i64, Option<i64>) = self.conn.query_row(
            "SELECT COUNT(*), SUM(tokens_used) FROM interactions WHERE DATE(timestamp) = ?1",
            params![day],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let (reviews, average_score): (i64, Option<f64>) = self.conn.query_row(
            "SELECT COUNT(*), AVG(score) FROM code_reviews WHERE DATE(timestamp) = ?1",
            params![day],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt = self.conn.prepare_cached(
            "SELECT query FROM interactions WHERE DATE(timestamp) = ?1
             ORDER BY timestamp DESC, id DESC
             LIMIT 10",
        )?;
        let rows = stmt.query_map(params![day], |row| row.get::<_, String>(0))?;
        let mut recent_queries = Vec::new();
        for row in rows {
            recent_queries.push(row?);
        }

        Ok(DailySummary {
            date,
            interactions: interactions.max(0) as u64,
            tokens_used: tokens_used.unwrap_or(0),
            reviews: reviews.max(0) as u64,
            average_score,
            recent_queries,
        })
    }

    /// Total number of stored interactions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Database`] on SQLite failures.
    pub fn interaction_count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM interactions", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a stored RFC 3339 timestamp, mapping failures to a column
/// conversion error so they surface as `StoreError::Database`.
fn parse_timestamp(
    value: &str,
    column: usize,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
