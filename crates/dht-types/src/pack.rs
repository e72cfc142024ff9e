use serde::{Deserialize, Serialize};

use crate::keys::{CachedPackKey, ChunkKey};
use crate::message::Message;
use crate::object::ObjectId;

/// Description of a pre-built pack a repository can serve as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedPackInfo {
    pub name: ObjectId,
    pub version: ObjectId,
    pub objects_total: u64,
    pub objects_delta: u64,
    pub bytes_total: u64,
    /// Commits the pack is complete for.
    pub tips: Vec<ObjectId>,
    /// Chunks making up the pack, in pack order.
    pub chunks: Vec<ChunkKey>,
}

impl CachedPackInfo {
    /// The key this pack is filed under in its repository record.
    pub fn key(&self) -> CachedPackKey {
        CachedPackKey::new(self.name, self.version)
    }
}

impl Message for CachedPackInfo {
    const NAME: &'static str = "cached pack info";
}
