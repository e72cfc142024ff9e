//! Identity convention: every record is addressed by its `_id` field.

use crate::value::{Document, Value};

/// Name of the identity field.
pub const ID_FIELD: &str = "_id";

/// A document holding only `_id`. Serves as a find/update/remove selector
/// and as the starting point for a full record.
pub fn by_id(key: impl Into<Value>) -> Document {
    Document::new().with(ID_FIELD, key)
}
