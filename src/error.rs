//! Error taxonomy for the query access layer.
//!
//! Fatal errors always propagate to the caller; there is no partial-result
//! recovery path. The only retried class is [`TransportError`], and the retry
//! loop lives in the orchestrator, not here.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for query execution and decoding.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed caller input (e.g. zero chunk size, empty workspace list).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend returned a non-success status on some page of a query.
    #[error("query failed with status {status}: {body}")]
    QueryFailed { status: u16, body: String },

    /// Transport-level failure (timeout or connection error). Retryable.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// More result pages exist than the configured page ceiling allows.
    /// Surfaced instead of silently truncating the result set.
    #[error("result set exceeds the page ceiling of {ceiling} page(s)")]
    ResultSetTooLarge { ceiling: usize },

    /// Malformed backend payload: row/column mismatch, unknown column type,
    /// or a cell of the wrong JSON kind.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl Error {
    /// Whether the orchestrator may retry the operation that produced this.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Transport-level failure classes. Both are considered transient.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request timed out before the backend answered.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established or broke mid-request.
    #[error("connection failed: {0}")]
    Connection(String),
}
