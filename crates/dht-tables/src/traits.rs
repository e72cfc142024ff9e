//! The table contracts consumed by the object-store protocol.
//!
//! Every implementation must be `Send + Sync` and keep no mutable state of
//! its own; the backing store is the only shared resource. Reads never
//! report absence as an error, and no operation retries internally.

use std::collections::{BTreeMap, HashMap};

use dht_types::{
    CachedPackInfo, CachedPackKey, ChunkInfo, ChunkKey, ChunkMeta, ChunkRecord, ObjectIndexKey,
    ObjectInfo, RefData, RefKey, RepositoryKey, RepositoryName,
};

use crate::error::DhtResult;

/// Maps repository names to repository keys.
pub trait RepositoryIndexTable: Send + Sync {
    /// Key currently bound to `name`, if any.
    fn get(&self, name: &RepositoryName) -> DhtResult<Option<RepositoryKey>>;

    /// Bind `name` to `key`, replacing whatever name `key` had.
    fn reserve(&self, name: &RepositoryName, key: RepositoryKey) -> DhtResult<()>;

    /// Drop the binding of `key`, but only if it is still bound to `name`.
    fn release(&self, name: &RepositoryName, key: RepositoryKey) -> DhtResult<()>;
}

/// Per-repository chunk and cached-pack bookkeeping, plus key allocation.
pub trait RepositoryTable: Send + Sync {
    /// Allocate a fresh repository key. Unique across all concurrent callers
    /// and processes sharing the store.
    fn next_key(&self) -> DhtResult<RepositoryKey>;

    /// Record (or overwrite) the info of one chunk.
    fn put_chunk_info(&self, repository: RepositoryKey, info: &ChunkInfo) -> DhtResult<()>;

    /// Forget the info of one chunk. A no-op when nothing is recorded.
    fn remove_chunk_info(&self, repository: RepositoryKey, chunk: &ChunkKey) -> DhtResult<()>;

    /// All chunk infos recorded for the repository, ordered by chunk key.
    fn chunk_infos(&self, repository: RepositoryKey) -> DhtResult<Vec<ChunkInfo>>;

    /// All cached packs recorded for the repository.
    fn cached_packs(&self, repository: RepositoryKey) -> DhtResult<Vec<CachedPackInfo>>;

    /// Record (or overwrite) a cached pack under `info.key()`.
    fn put_cached_pack(&self, repository: RepositoryKey, info: &CachedPackInfo) -> DhtResult<()>;

    /// Forget a cached pack. A no-op when nothing is recorded.
    fn remove_cached_pack(&self, repository: RepositoryKey, key: &CachedPackKey) -> DhtResult<()>;
}

/// Named refs of each repository.
pub trait RefTable: Send + Sync {
    /// Every ref of `repository`, and no ref of any other repository.
    fn get_all(&self, repository: RepositoryKey) -> DhtResult<BTreeMap<RefKey, RefData>>;

    /// Store `new` under `key` if the current value is `old` (`None` meaning
    /// the ref must not exist). Returns whether the write happened.
    ///
    /// Whether `old` is actually compared depends on the table's
    /// [`RefUpdateMode`](crate::RefUpdateMode).
    fn compare_and_put(
        &self,
        key: &RefKey,
        old: Option<&RefData>,
        new: &RefData,
    ) -> DhtResult<bool>;

    /// Delete `key` if its current value is `old`. Returns whether the
    /// delete happened. Subject to the same mode as
    /// [`compare_and_put`](RefTable::compare_and_put).
    fn compare_and_remove(&self, key: &RefKey, old: &RefData) -> DhtResult<bool>;
}

/// Which chunks hold each object.
pub trait ObjectIndexTable: Send + Sync {
    /// Associations of each requested object. Objects with no record are
    /// omitted. Any undecodable entry fails the whole batch.
    fn get(
        &self,
        objects: &[ObjectIndexKey],
    ) -> DhtResult<HashMap<ObjectIndexKey, Vec<ObjectInfo>>>;

    /// Add or replace the association of `object` with `info.chunk_key`,
    /// leaving its other associations alone.
    fn add(&self, object: &ObjectIndexKey, info: &ObjectInfo) -> DhtResult<()>;

    /// Remove the association of `object` with `chunk`.
    fn remove(&self, object: &ObjectIndexKey, chunk: &ChunkKey) -> DhtResult<()>;
}

/// Chunk payload, index, and metadata.
pub trait ChunkTable: Send + Sync {
    /// Stored chunks among `keys`. Chunks without data are skipped.
    fn get(&self, keys: &[ChunkKey]) -> DhtResult<Vec<ChunkRecord>>;

    /// Decoded metadata of the chunks among `keys` that have any.
    fn get_meta(&self, keys: &[ChunkKey]) -> DhtResult<HashMap<ChunkKey, ChunkMeta>>;

    /// Write the parts present on `chunk`. Absent parts are left as stored.
    fn put(&self, chunk: &ChunkRecord) -> DhtResult<()>;

    /// Delete the whole chunk.
    fn remove(&self, key: &ChunkKey) -> DhtResult<()>;
}
