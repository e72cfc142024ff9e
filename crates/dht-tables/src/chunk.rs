use std::collections::HashMap;
use std::sync::Arc;

use dht_document::fields::get_bytes;
use dht_document::{by_id, Collection, Document, Update};
use dht_types::{ChunkKey, ChunkMeta, ChunkRecord, Message};
use tracing::debug;

use crate::error::DhtResult;
use crate::schema::{DATA, INDEX, META};
use crate::traits::ChunkTable;

/// Chunks stored as `{_id: "<repo>.<chunk>", data, index, meta}` with every
/// part optional. A record without `data` does not count as a chunk.
pub struct DocChunkTable {
    collection: Arc<dyn Collection>,
}

impl DocChunkTable {
    pub fn new(collection: Arc<dyn Collection>) -> Self {
        Self { collection }
    }

    fn lookup(&self, key: &ChunkKey) -> DhtResult<Option<Document>> {
        Ok(self.collection.find_one(&by_id(key.as_string()))?)
    }
}

/// Metadata of `record`. A non-binary `meta` field reads as absent; binary
/// that fails to parse is an error.
fn decode_meta(record: &Document) -> DhtResult<Option<ChunkMeta>> {
    match get_bytes(record, META) {
        Some(bytes) => Ok(Some(ChunkMeta::parse_from(bytes)?)),
        None => Ok(None),
    }
}

impl ChunkTable for DocChunkTable {
    fn get(&self, keys: &[ChunkKey]) -> DhtResult<Vec<ChunkRecord>> {
        let mut chunks = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(record) = self.lookup(key)? else {
                continue;
            };
            let Some(data) = get_bytes(&record, DATA) else {
                continue;
            };
            chunks.push(ChunkRecord {
                chunk_key: *key,
                data: Some(data.to_vec()),
                index: get_bytes(&record, INDEX).map(<[u8]>::to_vec),
                meta: decode_meta(&record)?,
            });
        }
        Ok(chunks)
    }

    fn get_meta(&self, keys: &[ChunkKey]) -> DhtResult<HashMap<ChunkKey, ChunkMeta>> {
        let mut metas = HashMap::new();
        for key in keys {
            let Some(record) = self.lookup(key)? else {
                continue;
            };
            if let Some(meta) = decode_meta(&record)? {
                metas.insert(*key, meta);
            }
        }
        Ok(metas)
    }

    fn put(&self, chunk: &ChunkRecord) -> DhtResult<()> {
        let meta = chunk.meta.as_ref().map(ChunkMeta::to_bytes).transpose()?;
        let id = by_id(chunk.chunk_key.as_string());
        let parts = [
            (DATA, chunk.data.clone()),
            (INDEX, chunk.index.clone()),
            (META, meta),
        ];
        for (field, bytes) in parts {
            if let Some(bytes) = bytes {
                self.collection
                    .update(&id, &Update::set(field, bytes), true)?;
            }
        }
        Ok(())
    }

    fn remove(&self, key: &ChunkKey) -> DhtResult<()> {
        let removed = self.collection.remove(&by_id(key.as_string()))?;
        debug!(chunk = %key, removed, "removed chunk");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dht_document::{InMemoryCollection, Value};
    use dht_types::{BaseChunk, ObjectId, RepositoryKey};

    fn table() -> (Arc<InMemoryCollection>, DocChunkTable) {
        let collection = Arc::new(InMemoryCollection::new("chunks"));
        let table = DocChunkTable::new(collection.clone());
        (collection, table)
    }

    fn key(tag: &[u8]) -> ChunkKey {
        ChunkKey::new(RepositoryKey::from_int(5), ObjectId::hash(tag))
    }

    fn meta(tag: &[u8]) -> ChunkMeta {
        ChunkMeta {
            base_chunks: vec![BaseChunk {
                relative_start: 64,
                chunk_key: key(tag),
            }],
            fragments: Vec::new(),
        }
    }

    #[test]
    fn full_record_round_trips() {
        let (_, table) = table();
        let chunk = ChunkRecord::new(key(b"c"))
            .with_data(b"payload".to_vec())
            .with_index(b"idx".to_vec())
            .with_meta(meta(b"base"));
        table.put(&chunk).unwrap();
        assert_eq!(table.get(&[key(b"c")]).unwrap(), vec![chunk]);
    }

    #[test]
    fn partial_put_keeps_existing_parts() {
        let (_, table) = table();
        table
            .put(&ChunkRecord::new(key(b"c")).with_data(b"payload".to_vec()))
            .unwrap();
        table
            .put(&ChunkRecord::new(key(b"c")).with_index(b"idx".to_vec()))
            .unwrap();

        let got = table.get(&[key(b"c")]).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data.as_deref(), Some(&b"payload"[..]));
        assert_eq!(got[0].index.as_deref(), Some(&b"idx"[..]));
        assert_eq!(got[0].meta, None);
    }

    #[test]
    fn chunk_without_data_is_absent() {
        let (collection, table) = table();
        table
            .put(&ChunkRecord::new(key(b"c")).with_meta(meta(b"base")))
            .unwrap();
        assert_eq!(collection.len(), 1);
        assert!(table.get(&[key(b"c")]).unwrap().is_empty());
        // Metadata is still readable on its own.
        assert_eq!(table.get_meta(&[key(b"c")]).unwrap()[&key(b"c")], meta(b"base"));
    }

    #[test]
    fn empty_put_writes_nothing() {
        let (collection, table) = table();
        table.put(&ChunkRecord::new(key(b"c"))).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn get_meta_skips_chunks_without_meta() {
        let (_, table) = table();
        table
            .put(&ChunkRecord::new(key(b"plain")).with_data(b"x".to_vec()))
            .unwrap();
        table
            .put(
                &ChunkRecord::new(key(b"rich"))
                    .with_data(b"y".to_vec())
                    .with_meta(meta(b"base")),
            )
            .unwrap();
        let metas = table
            .get_meta(&[key(b"plain"), key(b"rich"), key(b"missing")])
            .unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[&key(b"rich")], meta(b"base"));
    }

    #[test]
    fn corrupt_meta_fails_batch() {
        let (collection, table) = table();
        table
            .put(&ChunkRecord::new(key(b"ok")).with_data(b"x".to_vec()))
            .unwrap();
        let bad = by_id(key(b"bad").as_string());
        collection.update(&bad, &Update::set(DATA, b"y".to_vec()), true).unwrap();
        collection.update(&bad, &Update::set(META, vec![0xffu8]), true).unwrap();
        let err = table.get(&[key(b"ok"), key(b"bad")]).unwrap_err();
        assert!(err.is_decode(), "unexpected error: {err}");
        assert!(table.get_meta(&[key(b"bad")]).unwrap_err().is_decode());
    }

    #[test]
    fn non_binary_meta_reads_as_absent() {
        let (collection, table) = table();
        let id = by_id(key(b"c").as_string());
        collection.update(&id, &Update::set(DATA, b"x".to_vec()), true).unwrap();
        collection
            .update(&id, &Update::set(META, Value::String("junk".into())), true)
            .unwrap();

        let got = table.get(&[key(b"c")]).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].data.as_deref(), Some(&b"x"[..]));
        assert_eq!(got[0].meta, None);
        assert!(table.get_meta(&[key(b"c")]).unwrap().is_empty());
    }

    #[test]
    fn remove_deletes_every_part() {
        let (collection, table) = table();
        table
            .put(
                &ChunkRecord::new(key(b"c"))
                    .with_data(b"x".to_vec())
                    .with_meta(meta(b"base")),
            )
            .unwrap();
        table.remove(&key(b"c")).unwrap();
        assert!(collection.is_empty());
        assert!(table.get_meta(&[key(b"c")]).unwrap().is_empty());
        // Removing again is harmless.
        table.remove(&key(b"c")).unwrap();
    }
}
