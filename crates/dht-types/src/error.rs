use thiserror::Error;

/// Errors produced by key parsing and payload encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid {kind} key {key:?}: {reason}")]
    InvalidKey {
        kind: &'static str,
        key: String,
        reason: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored payload could not be parsed as the expected message.
    #[error("cannot decode {message}: {reason}")]
    Deserialization {
        message: &'static str,
        reason: String,
    },
}

/// Result alias for type-level operations.
pub type TypeResult<T> = Result<T, TypeError>;
