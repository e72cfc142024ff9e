//! Reversible escaping of domain keys used as field names.
//!
//! Chunk and pack keys contain `.`, which the document format reads as a
//! path separator. Before such a key becomes a field name every `.` is
//! replaced with `:`, and the reverse substitution is applied when field
//! names are read back. Keys that already contain `:` are refused: letting
//! them through would make two different keys map to the same field.

use crate::error::{DocumentError, DocumentResult};
use crate::value::PATH_SEPARATOR;

/// Stand-in for [`PATH_SEPARATOR`] inside field names.
pub const ESCAPE_PLACEHOLDER: char = ':';

/// Escape `key` for use as a single field name.
pub fn escape_key(key: &str) -> DocumentResult<String> {
    if key.is_empty() {
        return Err(DocumentError::InvalidFieldPath {
            path: key.to_string(),
            reason: "empty key".to_string(),
        });
    }
    if key.contains(ESCAPE_PLACEHOLDER) || key.starts_with('$') {
        return Err(DocumentError::UnescapableKey(key.to_string()));
    }
    Ok(key.replace(PATH_SEPARATOR, &ESCAPE_PLACEHOLDER.to_string()))
}

/// Recover the domain key from an escaped field name.
pub fn unescape_key(field: &str) -> String {
    field.replace(ESCAPE_PLACEHOLDER, &PATH_SEPARATOR.to_string())
}

/// `<prefix>.<escaped key>`, addressing one entry of a sparse map field.
pub fn field_path(prefix: &str, key: &str) -> DocumentResult<String> {
    Ok(format!("{prefix}{PATH_SEPARATOR}{}", escape_key(key)?))
}
