use std::sync::Arc;

use dht_document::{DocumentStore, InMemoryDocumentStore};
use dht_types::{RepositoryKey, RepositoryName};
use tracing::{info, warn};

use crate::chunk::DocChunkTable;
use crate::config::DatabaseConfig;
use crate::error::DhtResult;
use crate::object_index::DocObjectIndexTable;
use crate::refs::DocRefTable;
use crate::repository::DocRepositoryTable;
use crate::repository_index::DocRepositoryIndexTable;
use crate::traits::{ChunkTable, ObjectIndexTable, RefTable, RepositoryIndexTable, RepositoryTable};

/// The five tables bound to one document database.
pub struct Database {
    store: Arc<dyn DocumentStore>,
    config: DatabaseConfig,
    repository_index: DocRepositoryIndexTable,
    repository: DocRepositoryTable,
    refs: DocRefTable,
    object_index: DocObjectIndexTable,
    chunks: DocChunkTable,
}

impl Database {
    /// Bind every table to the collection `config` names for it.
    pub fn new(store: Arc<dyn DocumentStore>, config: DatabaseConfig) -> DhtResult<Self> {
        config.validate()?;
        if store.name() != config.database {
            warn!(
                store = store.name(),
                configured = %config.database,
                "document store name differs from configured database"
            );
        }
        let names = &config.collections;
        let repository_index =
            DocRepositoryIndexTable::new(store.collection(&names.repository_index)?);
        let repository = DocRepositoryTable::new(
            store.collection(&names.repositories)?,
            store.collection(&names.repository_info)?,
        );
        let refs = DocRefTable::new(store.collection(&names.refs)?, config.ref_update_mode);
        let object_index = DocObjectIndexTable::new(store.collection(&names.objects)?);
        let chunks = DocChunkTable::new(store.collection(&names.chunks)?);
        info!(
            database = %config.database,
            ref_update_mode = ?config.ref_update_mode,
            "opened dht database"
        );
        Ok(Self {
            store,
            config,
            repository_index,
            repository,
            refs,
            object_index,
            chunks,
        })
    }

    /// A database over a fresh in-memory store with the default layout.
    pub fn in_memory() -> DhtResult<Self> {
        let config = DatabaseConfig::default();
        let store = Arc::new(InMemoryDocumentStore::new(config.database.clone()));
        Self::new(store, config)
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn repository_index(&self) -> &dyn RepositoryIndexTable {
        &self.repository_index
    }

    pub fn repository(&self) -> &dyn RepositoryTable {
        &self.repository
    }

    pub fn refs(&self) -> &dyn RefTable {
        &self.refs
    }

    pub fn object_index(&self) -> &dyn ObjectIndexTable {
        &self.object_index
    }

    pub fn chunks(&self) -> &dyn ChunkTable {
        &self.chunks
    }

    /// Resolve `name` to its repository key, creating the repository when
    /// it is unknown and `must_exist` is false.
    ///
    /// Two callers creating the same name at once each allocate a key; the
    /// later `reserve` wins the name and the other key is left unnamed.
    pub fn open_repository(
        &self,
        name: &RepositoryName,
        must_exist: bool,
    ) -> DhtResult<Option<RepositoryKey>> {
        if let Some(key) = self.repository_index.get(name)? {
            return Ok(Some(key));
        }
        if must_exist {
            return Ok(None);
        }
        let key = self.repository.next_key()?;
        self.repository_index.reserve(name, key)?;
        info!(%name, %key, "created repository");
        Ok(Some(key))
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("store", &self.store.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RefUpdateMode;

    fn name(s: &str) -> RepositoryName {
        RepositoryName::new(s).unwrap()
    }

    #[test]
    fn open_creates_then_finds() {
        let db = Database::in_memory().unwrap();
        let created = db.open_repository(&name("linux"), false).unwrap().unwrap();
        let found = db.open_repository(&name("linux"), true).unwrap();
        assert_eq!(found, Some(created));
    }

    #[test]
    fn open_existing_only() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.open_repository(&name("linux"), true).unwrap(), None);
        assert_eq!(db.repository_index().get(&name("linux")).unwrap(), None);
    }

    #[test]
    fn distinct_repositories_get_distinct_keys() {
        let db = Database::in_memory().unwrap();
        let a = db.open_repository(&name("a"), false).unwrap();
        let b = db.open_repository(&name("b"), false).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tables_use_configured_collections() {
        let store = Arc::new(InMemoryDocumentStore::new("git"));
        let mut config = DatabaseConfig::default();
        config.collections.chunks = "blobs".into();
        let db = Database::new(store.clone(), config).unwrap();

        let key = db.open_repository(&name("r"), false).unwrap().unwrap();
        let chunk = dht_types::ChunkKey::new(key, dht_types::ObjectId::hash(b"c"));
        db.chunks()
            .put(&dht_types::ChunkRecord::new(chunk).with_data(b"x".to_vec()))
            .unwrap();

        assert_eq!(store.in_memory_collection("blobs").unwrap().len(), 1);
        assert!(store.in_memory_collection("chunks").unwrap().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let store = Arc::new(InMemoryDocumentStore::new("git"));
        let mut config = DatabaseConfig::default();
        config.collections.objects = "refs".into();
        assert!(Database::new(store, config).is_err());
    }

    #[test]
    fn ref_mode_reaches_ref_table() {
        let store = Arc::new(InMemoryDocumentStore::new("git"));
        let config = DatabaseConfig {
            ref_update_mode: RefUpdateMode::Checked,
            ..DatabaseConfig::default()
        };
        let db = Database::new(store, config).unwrap();
        assert_eq!(db.refs.mode(), RefUpdateMode::Checked);
    }
}
