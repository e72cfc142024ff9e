use std::sync::Arc;

use dht_document::fields::{get_document, get_int};
use dht_document::{by_id, field_path, unescape_key, Collection, Document, Update};
use dht_types::{
    CachedPackInfo, CachedPackKey, ChunkInfo, ChunkInfoData, ChunkKey, Message, RepositoryKey,
};
use tracing::debug;

use crate::error::{DhtError, DhtResult};
use crate::schema::{decode_payload, CHUNKS, KEY, METADATA, PACKS};
use crate::traits::RepositoryTable;

/// Repository records keyed by repository key, each holding two sparse maps:
///
/// ```text
/// { _id: 7,
///   chunks: { "00000007:<hash>": <ChunkInfoData> , ... },
///   packs:  { "<name>:<version>": <CachedPackInfo>, ... } }
/// ```
///
/// The key counter lives in a separate collection as `{metadata: 0, key: n}`.
pub struct DocRepositoryTable {
    repositories: Arc<dyn Collection>,
    counter: Arc<dyn Collection>,
}

impl DocRepositoryTable {
    pub fn new(repositories: Arc<dyn Collection>, counter: Arc<dyn Collection>) -> Self {
        Self {
            repositories,
            counter,
        }
    }

    fn put_entry(
        &self,
        repository: RepositoryKey,
        prefix: &str,
        key: &str,
        bytes: Vec<u8>,
    ) -> DhtResult<()> {
        let path = field_path(prefix, key)?;
        self.repositories
            .update(&by_id(repository.as_int()), &Update::set(path, bytes), true)?;
        Ok(())
    }

    fn remove_entry(&self, repository: RepositoryKey, prefix: &str, key: &str) -> DhtResult<()> {
        let path = field_path(prefix, key)?;
        self.repositories
            .update(&by_id(repository.as_int()), &Update::unset(path), false)?;
        Ok(())
    }

    /// The sparse map stored under `prefix`, if the record and map exist.
    fn sparse_map(&self, repository: RepositoryKey, prefix: &str) -> DhtResult<Option<Document>> {
        let record = self.repositories.find_one(&by_id(repository.as_int()))?;
        Ok(record.and_then(|r| get_document(&r, prefix).cloned()))
    }
}

impl RepositoryTable for DocRepositoryTable {
    fn next_key(&self) -> DhtResult<RepositoryKey> {
        let selector = Document::new().with(METADATA, 0);
        let corrupt = |reason: &str| DhtError::CorruptRecord {
            collection: self.counter.name().to_string(),
            reason: reason.to_string(),
        };
        let record = self
            .counter
            .find_and_modify(&selector, &Update::inc(KEY, 1), true, true)?
            .ok_or_else(|| corrupt("counter upsert returned no record"))?;
        let raw = get_int(&record, KEY).ok_or_else(|| corrupt("counter has no integer key"))?;
        let key = i32::try_from(raw).map_err(|_| corrupt("counter exceeds repository key range"))?;
        debug!(key, "allocated repository key");
        Ok(RepositoryKey::from_int(key))
    }

    fn put_chunk_info(&self, repository: RepositoryKey, info: &ChunkInfo) -> DhtResult<()> {
        self.put_entry(
            repository,
            CHUNKS,
            &info.chunk_key.as_string(),
            info.data.to_bytes()?,
        )
    }

    fn remove_chunk_info(&self, repository: RepositoryKey, chunk: &ChunkKey) -> DhtResult<()> {
        self.remove_entry(repository, CHUNKS, &chunk.as_string())
    }

    fn chunk_infos(&self, repository: RepositoryKey) -> DhtResult<Vec<ChunkInfo>> {
        let Some(chunks) = self.sparse_map(repository, CHUNKS)? else {
            return Ok(Vec::new());
        };
        chunks
            .iter()
            .map(|(field, value)| -> DhtResult<ChunkInfo> {
                let chunk_key = ChunkKey::from_string(&unescape_key(field))?;
                let data: ChunkInfoData = decode_payload(Some(value), field)?;
                Ok(ChunkInfo::new(chunk_key, data))
            })
            .collect()
    }

    fn cached_packs(&self, repository: RepositoryKey) -> DhtResult<Vec<CachedPackInfo>> {
        let Some(packs) = self.sparse_map(repository, PACKS)? else {
            return Ok(Vec::new());
        };
        packs
            .iter()
            .map(|(field, value)| decode_payload(Some(value), field))
            .collect()
    }

    fn put_cached_pack(&self, repository: RepositoryKey, info: &CachedPackInfo) -> DhtResult<()> {
        self.put_entry(repository, PACKS, &info.key().as_string(), info.to_bytes()?)
    }

    fn remove_cached_pack(&self, repository: RepositoryKey, key: &CachedPackKey) -> DhtResult<()> {
        self.remove_entry(repository, PACKS, &key.as_string())
    }
}
