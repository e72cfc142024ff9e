use std::collections::HashMap;
use std::sync::Arc;

use dht_document::fields::get_document;
use dht_document::{by_id, field_path, unescape_key, Collection, Update};
use dht_types::{ChunkKey, Message, ObjectIndexKey, ObjectInfo, ObjectInfoData};

use crate::error::DhtResult;
use crate::schema::{decode_payload, VALUES};
use crate::traits::ObjectIndexTable;

/// Object index stored as `{_id: "<repo>.<object>", values: {<chunk>: info}}`.
pub struct DocObjectIndexTable {
    collection: Arc<dyn Collection>,
}

impl DocObjectIndexTable {
    pub fn new(collection: Arc<dyn Collection>) -> Self {
        Self { collection }
    }
}

impl ObjectIndexTable for DocObjectIndexTable {
    fn get(
        &self,
        objects: &[ObjectIndexKey],
    ) -> DhtResult<HashMap<ObjectIndexKey, Vec<ObjectInfo>>> {
        let mut found = HashMap::with_capacity(objects.len());
        for object in objects {
            let Some(record) = self.collection.find_one(&by_id(object.as_string()))? else {
                continue;
            };
            let Some(values) = get_document(&record, VALUES) else {
                continue;
            };
            let mut infos = Vec::with_capacity(values.len());
            for (field, value) in values.iter() {
                let chunk_key = ChunkKey::from_string(&unescape_key(field))?;
                let data: ObjectInfoData = decode_payload(Some(value), field)?;
                infos.push(ObjectInfo::new(chunk_key, 0, data));
            }
            found.insert(*object, infos);
        }
        Ok(found)
    }

    fn add(&self, object: &ObjectIndexKey, info: &ObjectInfo) -> DhtResult<()> {
        let path = field_path(VALUES, &info.chunk_key.as_string())?;
        self.collection.update(
            &by_id(object.as_string()),
            &Update::set(path, info.data.to_bytes()?),
            true,
        )?;
        Ok(())
    }

    fn remove(&self, object: &ObjectIndexKey, chunk: &ChunkKey) -> DhtResult<()> {
        let path = field_path(VALUES, &chunk.as_string())?;
        self.collection
            .update(&by_id(object.as_string()), &Update::unset(path), false)?;
        Ok(())
    }
}
