//! Chunk payloads: per-repository chunk info, chunk metadata, and the
//! record shape returned by chunk table reads.

use serde::{Deserialize, Serialize};

use crate::keys::ChunkKey;
use crate::message::Message;
use crate::object_info::ObjectType;

/// How a chunk entered the repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkSource {
    /// Written by a local insert.
    Insert,
    /// Received from a push or fetch.
    Receive,
    /// Produced by repacking.
    Pack,
}

/// Summary of a chunk as recorded in its repository's record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkInfoData {
    pub source: ChunkSource,
    /// Set when every object in the chunk has the same type.
    pub object_type: Option<ObjectType>,
    /// The chunk holds one fragment of a larger object.
    pub is_fragment: bool,
    pub object_count: u32,
    pub chunk_size: u32,
    pub index_size: u32,
    pub meta_size: u32,
}

impl Message for ChunkInfoData {
    const NAME: &'static str = "chunk info";
}

/// A chunk info entry together with the chunk it describes.
///
/// Only `data` is stored as the payload; the key becomes the field name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkInfo {
    pub chunk_key: ChunkKey,
    pub data: ChunkInfoData,
}

impl ChunkInfo {
    pub fn new(chunk_key: ChunkKey, data: ChunkInfoData) -> Self {
        Self { chunk_key, data }
    }
}

/// A chunk this chunk's deltas are based on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseChunk {
    /// Offset, relative to this chunk, of the first object using the base.
    pub relative_start: u64,
    pub chunk_key: ChunkKey,
}

/// Structured metadata stored alongside chunk data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    pub base_chunks: Vec<BaseChunk>,
    /// Chunks holding the remaining fragments of a large object.
    pub fragments: Vec<ChunkKey>,
}

impl Message for ChunkMeta {
    const NAME: &'static str = "chunk meta";
}

/// The up-to-three stored parts of a chunk.
///
/// Each part is optional on write. Reads only return records whose `data`
/// is present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkRecord {
    pub chunk_key: ChunkKey,
    pub data: Option<Vec<u8>>,
    pub index: Option<Vec<u8>>,
    pub meta: Option<ChunkMeta>,
}

impl ChunkRecord {
    /// An empty record for `chunk_key`; writing it touches nothing.
    pub fn new(chunk_key: ChunkKey) -> Self {
        Self {
            chunk_key,
            data: None,
            index: None,
            meta: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<Vec<u8>>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_meta(mut self, meta: ChunkMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}
