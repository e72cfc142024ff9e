use std::sync::Arc;

use dht_document::fields::{get_int, get_string};
use dht_document::{by_id, Collection, Document, Update, ID_FIELD};
use dht_types::{RepositoryKey, RepositoryName};
use tracing::debug;

use crate::error::DhtResult;
use crate::schema::NAME;
use crate::traits::RepositoryIndexTable;

/// Repository index stored as `{_id: <repository key>, name: <name>}`.
pub struct DocRepositoryIndexTable {
    collection: Arc<dyn Collection>,
}

impl DocRepositoryIndexTable {
    pub fn new(collection: Arc<dyn Collection>) -> Self {
        Self { collection }
    }
}

impl RepositoryIndexTable for DocRepositoryIndexTable {
    fn get(&self, name: &RepositoryName) -> DhtResult<Option<RepositoryKey>> {
        let selector = Document::new().with(NAME, name.as_str());
        let Some(record) = self.collection.find_one(&selector)? else {
            return Ok(None);
        };
        Ok(get_int(&record, ID_FIELD)
            .and_then(|raw| i32::try_from(raw).ok())
            .map(RepositoryKey::from_int))
    }

    fn reserve(&self, name: &RepositoryName, key: RepositoryKey) -> DhtResult<()> {
        self.collection
            .update(&by_id(key.as_int()), &Update::set(NAME, name.as_str()), true)?;
        Ok(())
    }

    fn release(&self, name: &RepositoryName, key: RepositoryKey) -> DhtResult<()> {
        let id = by_id(key.as_int());
        let Some(current) = self.collection.find_one(&id)? else {
            return Ok(());
        };
        if get_string(&current, NAME) != Some(name.as_str()) {
            debug!(%key, %name, "repository key rebound to another name; not releasing");
            return Ok(());
        }
        self.collection.update(&id, &Update::unset(NAME), false)?;
        Ok(())
    }
}
