//! Partial updates.
//!
//! An [`Update`] is plain data describing a change to one document. It has
//! no effect until a [`Collection`](crate::Collection) applies it, which lets
//! the tables pair any selector with any update and an upsert flag.

use crate::error::{DocumentError, DocumentResult};
use crate::id::ID_FIELD;
use crate::value::{split_path, Document, Value, PATH_SEPARATOR};

/// One operator of a modifying update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldOp {
    /// Set the field, creating intermediate documents.
    Set { path: String, value: Value },
    /// Remove the field if present.
    Unset { path: String },
    /// Add `delta` to an integer field, creating it at `delta`.
    Inc { path: String, delta: i64 },
    /// Set the field only when the update inserts a new document.
    SetOnInsert { path: String, value: Value },
}

impl FieldOp {
    pub fn path(&self) -> &str {
        match self {
            FieldOp::Set { path, .. }
            | FieldOp::Unset { path }
            | FieldOp::Inc { path, .. }
            | FieldOp::SetOnInsert { path, .. } => path,
        }
    }
}

/// A change to apply to one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Update {
    /// Field operators; every field not named is left alone.
    Modify(Vec<FieldOp>),
    /// Replace every field except `_id`.
    Replace(Document),
}

impl Update {
    pub fn set(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Update::Modify(vec![FieldOp::Set {
            path: path.into(),
            value: value.into(),
        }])
    }

    pub fn unset(path: impl Into<String>) -> Self {
        Update::Modify(vec![FieldOp::Unset { path: path.into() }])
    }

    pub fn inc(path: impl Into<String>, delta: i64) -> Self {
        Update::Modify(vec![FieldOp::Inc {
            path: path.into(),
            delta,
        }])
    }

    pub fn set_on_insert(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Update::Modify(vec![FieldOp::SetOnInsert {
            path: path.into(),
            value: value.into(),
        }])
    }

    pub fn replace(document: Document) -> Self {
        Update::Replace(document)
    }

    /// Check field paths without touching any document.
    pub fn validate(&self) -> DocumentResult<()> {
        let Update::Modify(ops) = self else {
            return Ok(());
        };
        for (i, op) in ops.iter().enumerate() {
            let path = op.path();
            let segments = split_path(path)?;
            if segments[0] == ID_FIELD {
                return Err(DocumentError::InvalidFieldPath {
                    path: path.to_string(),
                    reason: "the identity field cannot be modified".to_string(),
                });
            }
            if ops[..i].iter().any(|prior| overlaps(prior.path(), path)) {
                return Err(DocumentError::InvalidFieldPath {
                    path: path.to_string(),
                    reason: "conflicts with another operator in the same update".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Apply to `doc`. `inserting` is true when the document was just
    /// created by an upsert. Either every operator applies or `doc` is left
    /// unchanged.
    pub fn apply(&self, doc: &mut Document, inserting: bool) -> DocumentResult<()> {
        self.validate()?;
        let mut next = doc.clone();
        match self {
            Update::Replace(replacement) => {
                let id = next.remove(ID_FIELD);
                next = replacement.clone();
                next.remove(ID_FIELD);
                if let Some(id) = id {
                    next.insert(ID_FIELD, id);
                }
            }
            Update::Modify(ops) => {
                for op in ops {
                    apply_op(&mut next, op, inserting)?;
                }
            }
        }
        *doc = next;
        Ok(())
    }
}

fn apply_op(doc: &mut Document, op: &FieldOp, inserting: bool) -> DocumentResult<()> {
    match op {
        FieldOp::Set { path, value } => doc.set_path(path, value.clone()),
        FieldOp::SetOnInsert { path, value } if inserting => doc.set_path(path, value.clone()),
        FieldOp::SetOnInsert { .. } => Ok(()),
        FieldOp::Unset { path } => doc.remove_path(path).map(|_| ()),
        FieldOp::Inc { path, delta } => {
            let (parent, last) = doc.parent_mut(path)?;
            match parent.get_mut(last) {
                None => {
                    parent.insert(last, Value::Int(*delta));
                    Ok(())
                }
                Some(Value::Int(current)) => {
                    *current = current.checked_add(*delta).ok_or_else(|| {
                        DocumentError::TypeMismatch {
                            path: path.clone(),
                            expected: "integer within i64 range",
                        }
                    })?;
                    Ok(())
                }
                Some(_) => Err(DocumentError::TypeMismatch {
                    path: path.clone(),
                    expected: "integer",
                }),
            }
        }
    }
}

fn overlaps(a: &str, b: &str) -> bool {
    let prefix_of = |short: &str, long: &str| {
        long.len() > short.len()
            && long.starts_with(short)
            && long[short.len()..].starts_with(PATH_SEPARATOR)
    };
    a == b || prefix_of(a, b) || prefix_of(b, a)
}
