//! Per-chunk location of an object, as stored in the object index.

use serde::{Deserialize, Serialize};

use crate::keys::ChunkKey;
use crate::message::Message;
use crate::object::ObjectId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Commit,
    Tree,
    Blob,
    Tag,
}

/// Where an object lives inside one chunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfoData {
    pub object_type: ObjectType,
    /// Byte offset of the object within the chunk.
    pub offset: u32,
    pub packed_size: u64,
    pub inflated_size: u64,
    /// Present when the object is stored as a delta.
    pub delta_base: Option<ObjectId>,
    pub is_fragmented: bool,
}

impl Message for ObjectInfoData {
    const NAME: &'static str = "object info";
}

/// One (chunk, location) association of an indexed object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectInfo {
    pub chunk_key: ChunkKey,
    /// Ordering hint among several chunks holding the same object. Reads from
    /// the document tables always report zero.
    pub time: u64,
    pub data: ObjectInfoData,
}

impl ObjectInfo {
    pub fn new(chunk_key: ChunkKey, time: u64, data: ObjectInfoData) -> Self {
        Self {
            chunk_key,
            time,
            data,
        }
    }
}
