//! Store error types.

use thiserror::Error;

/// Errors raised by the interaction log.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite failure — the storage is unavailable or a write failed.
    #[error("storage error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem failure (e.g. the database directory is not writable).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, StoreError>;
