//! Error types for table operations.

use dht_document::DocumentError;
use dht_types::TypeError;
use thiserror::Error;

/// Errors surfaced by the DHT tables.
///
/// Absence is never an error: a missing record or field shows up as `None`
/// or as an omitted entry in a batch result.
#[derive(Debug, Error)]
pub enum DhtError {
    /// A stored payload or key failed to parse, or a payload failed to
    /// encode. Fatal to the whole enclosing operation.
    #[error("codec error: {0}")]
    Codec(#[from] TypeError),

    /// The document store failed.
    #[error("storage error: {0}")]
    Storage(DocumentError),

    /// The document store did not answer in time; the caller may retry.
    #[error("document store timeout: {0}")]
    Timeout(DocumentError),

    /// A key cannot be represented as a field name.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A record exists but lacks a field the table itself maintains.
    #[error("corrupt record in {collection}: {reason}")]
    CorruptRecord { collection: String, reason: String },

    /// The configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DhtError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DhtError::Timeout(_))
    }

    /// True when a stored payload could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            DhtError::Codec(TypeError::Deserialization { .. } | TypeError::InvalidKey { .. })
        )
    }
}

impl From<DocumentError> for DhtError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Timeout { .. } => DhtError::Timeout(err),
            DocumentError::UnescapableKey(key) => DhtError::InvalidKey(key),
            other => DhtError::Storage(other),
        }
    }
}

/// Result alias for table operations.
pub type DhtResult<T> = Result<T, DhtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_stay_distinct() {
        let err: DhtError = DocumentError::Timeout {
            operation: "find",
            collection: "refs".into(),
        }
        .into();
        assert!(err.is_timeout());
        assert!(!err.is_decode());
        assert_eq!(err.to_string(), "document store timeout: find on refs timed out");
    }

    #[test]
    fn backend_failures_are_storage_errors() {
        let err: DhtError = DocumentError::Backend("connection reset".into()).into();
        assert!(matches!(err, DhtError::Storage(_)));
        assert!(!err.is_timeout());
    }

    #[test]
    fn unescapable_keys_are_invalid_keys() {
        let err: DhtError = DocumentError::UnescapableKey("a:b".into()).into();
        assert!(matches!(err, DhtError::InvalidKey(k) if k == "a:b"));
    }

    #[test]
    fn decode_classification() {
        let err: DhtError = TypeError::Deserialization {
            message: "ref data",
            reason: "eof".into(),
        }
        .into();
        assert!(err.is_decode());

        let err: DhtError = TypeError::Serialization("oops".into()).into();
        assert!(!err.is_decode());
    }
}
