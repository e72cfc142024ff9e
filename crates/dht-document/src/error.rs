use thiserror::Error;

/// Errors from document operations and backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The field path is empty, has an empty segment, or targets `_id`.
    #[error("invalid field path {path:?}: {reason}")]
    InvalidFieldPath { path: String, reason: String },

    /// A domain key cannot be embedded in a field name without ambiguity.
    #[error("key {0:?} contains the escape placeholder and cannot be used as a field name")]
    UnescapableKey(String),

    /// An operator met a field of the wrong type, e.g. `inc` on a string.
    #[error("type mismatch at {path:?}: expected {expected}")]
    TypeMismatch { path: String, expected: &'static str },

    /// The backend did not answer within its deadline.
    #[error("{operation} on {collection} timed out")]
    Timeout {
        operation: &'static str,
        collection: String,
    },

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl DocumentError {
    /// True when the backend gave up waiting; the operation may be retried.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DocumentError::Timeout { .. })
    }
}

/// Result alias for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
