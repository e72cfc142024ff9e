use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, DocumentResult};

/// Separator between the segments of a nested field path.
pub const PATH_SEPARATOR: char = '.';

/// A field value inside a [`Document`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    Binary(Vec<u8>),
    Document(Document),
}

impl Value {
    /// The bytes of a `Binary` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// The text of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number held by an `Int` value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The nested document of a `Document` value.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Document(_) => "document",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Binary(v.to_vec())
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Value::Document(v)
    }
}

/// An ordered map of field names to values.
///
/// Top-level accessors (`get`, `insert`, `remove`) take a single field name.
/// The `*_path` accessors take a dotted path and walk nested documents.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder form of [`Document::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Set a top-level field, returning its previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Value of a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Remove a top-level field, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Whether a top-level field is present.
    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level field names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Top-level fields and their values in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve a dotted path through nested documents.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split(PATH_SEPARATOR);
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_document()?.0.get(segment)?;
        }
        Some(current)
    }

    /// Set the value at a dotted path, creating intermediate documents.
    pub fn set_path(&mut self, path: &str, value: Value) -> DocumentResult<()> {
        let (parent, last) = self.parent_mut(path)?;
        parent.0.insert(last.to_string(), value);
        Ok(())
    }

    /// Remove the value at a dotted path. Missing intermediates are not
    /// created.
    pub fn remove_path(&mut self, path: &str) -> DocumentResult<Option<Value>> {
        let segments = split_path(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Ok(None);
        };
        let mut current = self;
        for segment in parents {
            current = match current.0.get_mut(*segment) {
                Some(Value::Document(doc)) => doc,
                _ => return Ok(None),
            };
        }
        Ok(current.0.remove(*last))
    }

    /// The document directly holding the last segment of `path`, created on
    /// demand, and that last segment.
    pub(crate) fn parent_mut<'a>(
        &'a mut self,
        path: &'a str,
    ) -> DocumentResult<(&'a mut Document, &'a str)> {
        let segments = split_path(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(invalid_path(path, "empty path"));
        };
        let mut current = self;
        for segment in parents {
            let slot = current
                .0
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Document(Document::new()));
            current = match slot {
                Value::Document(doc) => doc,
                _ => {
                    return Err(DocumentError::TypeMismatch {
                        path: path.to_string(),
                        expected: "document",
                    })
                }
            };
        }
        Ok((current, *last))
    }

    pub(crate) fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn invalid_path(path: &str, reason: &str) -> DocumentError {
    DocumentError::InvalidFieldPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Split a dotted path, rejecting empty paths and empty segments.
pub(crate) fn split_path(path: &str) -> DocumentResult<Vec<&str>> {
    if path.is_empty() {
        return Err(invalid_path(path, "empty path"));
    }
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(invalid_path(path, "empty segment"));
    }
    if segments.iter().any(|s| s.starts_with('$')) {
        return Err(invalid_path(path, "segment starts with '$'"));
    }
    Ok(segments)
}
