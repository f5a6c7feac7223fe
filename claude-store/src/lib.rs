//! # claude-store — local interaction log
//!
//! A durable, append-only record of model calls for later retrieval:
//! query/response pairs with a token estimate, and code-review results.
//! Backed by a single SQLite database with two tables (`interactions`,
//! `code_reviews`); the schema is created idempotently on first use.
//!
//! Records are immutable once written — there is no update or delete path,
//! and no retention policy. Single-process, single-threaded access is
//! assumed; the store is opened, used, and dropped per scope.

pub mod error;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::InteractionStore;
pub use types::{CodeReviewRecord, DailySummary, InteractionRecord};
