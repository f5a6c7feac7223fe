//! Record types stored in the interaction log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// A logged query/response pair.
///
/// Created on every logged call; never mutated, never deleted.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionRecord {
    /// Monotonic row identifier.
    pub id: i64,
    /// When the interaction was recorded.
    pub timestamp: DateTime<Utc>,
    /// The user's query text.
    pub query: String,
    /// The model's response text.
    pub response: String,
    /// Historical context that was prepended to the query, if any.
    pub context: Option<String>,
    /// Whitespace-token estimate for prompt plus response.
    pub tokens_used: i64,
}

/// A logged code-review result.
#[derive(Debug, Clone, Serialize)]
pub struct CodeReviewRecord {
    /// Monotonic row identifier.
    pub id: i64,
    /// When the review was recorded.
    pub timestamp: DateTime<Utc>,
    /// Path of the reviewed file.
    pub file_path: String,
    /// Free-text analysis returned by the model.
    pub issues: String,
    /// Suggestion text (empty when the analysis was not split out).
    pub suggestions: String,
    /// Quality score extracted from the analysis, when one was parseable.
    pub score: Option<i64>,
}

/// Aggregates for a single calendar date.
///
/// Zero-activity days report zeros and an empty query list — never an error.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    /// The date the summary covers.
    pub date: NaiveDate,
    /// Number of interactions recorded that day.
    pub interactions: u64,
    /// Sum of token estimates across those interactions.
    pub tokens_used: i64,
    /// Number of code reviews recorded that day.
    pub reviews: u64,
    /// Average review score, over reviews that have one.
    pub average_score: Option<f64>,
    /// The most recent queries of the day, newest first (at most 10).
    pub recent_queries: Vec<String>,
}
