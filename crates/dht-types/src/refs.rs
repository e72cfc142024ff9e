use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::object::ObjectId;

/// What a ref points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefTarget {
    /// Points directly at an object, optionally with its peeled target.
    Object {
        id: ObjectId,
        peeled: Option<ObjectId>,
    },
    /// Points at another ref by name.
    Symbolic(String),
}

/// Stored value of a ref.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefData {
    pub target: RefTarget,
    /// Bumped by the writer on every update.
    pub sequence: u64,
}

impl RefData {
    pub fn id(id: ObjectId, sequence: u64) -> Self {
        Self {
            target: RefTarget::Object { id, peeled: None },
            sequence,
        }
    }

    pub fn symbolic(name: impl Into<String>, sequence: u64) -> Self {
        Self {
            target: RefTarget::Symbolic(name.into()),
            sequence,
        }
    }
}

impl Message for RefData {
    const NAME: &'static str = "ref data";
}
