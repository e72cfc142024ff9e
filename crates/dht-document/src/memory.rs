//! In-memory document store for tests and embedding.
//!
//! Each [`InMemoryCollection`] keeps its documents in a `BTreeMap` keyed by
//! `_id` behind a `RwLock`. Every primitive runs under the lock, which gives
//! the per-document atomicity the [`Collection`] contract asks for
//! (including an indivisible `find_and_modify`). Data is lost when the store
//! is dropped.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;
use uuid::Uuid;

use crate::error::{DocumentError, DocumentResult};
use crate::id::ID_FIELD;
use crate::traits::{Collection, Cursor, DocumentStore, UpdateOutcome};
use crate::update::Update;
use crate::value::{Document, Value};

type Documents = BTreeMap<Value, Document>;

/// A single in-memory collection.
pub struct InMemoryCollection {
    name: String,
    documents: RwLock<Documents>,
}

impl InMemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored document, ordered by `_id`.
    pub fn documents(&self) -> Vec<Document> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    fn read(&self) -> DocumentResult<RwLockReadGuard<'_, Documents>> {
        self.documents
            .read()
            .map_err(|e| DocumentError::Backend(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> DocumentResult<RwLockWriteGuard<'_, Documents>> {
        self.documents
            .write()
            .map_err(|e| DocumentError::Backend(format!("lock poisoned: {e}")))
    }

    /// Build and store the document an upsert creates.
    fn insert_new(
        &self,
        docs: &mut Documents,
        selector: &Document,
        update: &Update,
    ) -> DocumentResult<Document> {
        let mut doc = Document::new();
        for (path, value) in selector.iter() {
            doc.set_path(path, value.clone())?;
        }
        if !doc.contains_key(ID_FIELD) {
            doc.insert(ID_FIELD, Uuid::now_v7().to_string());
        }
        update.apply(&mut doc, true)?;

        let id = doc.get(ID_FIELD).cloned().unwrap_or(Value::Null);
        if docs.contains_key(&id) {
            return Err(DocumentError::Backend(format!(
                "duplicate {ID_FIELD} {id:?} in {}",
                self.name
            )));
        }
        debug!(collection = %self.name, id = ?id, "upsert inserted document");
        docs.insert(id, doc.clone());
        Ok(doc)
    }
}

fn matches(doc: &Document, selector: &Document) -> bool {
    selector
        .iter()
        .all(|(path, expected)| doc.get_path(path) == Some(expected))
}

/// `_id` of the first document matching `selector`.
fn first_match(docs: &Documents, selector: &Document) -> Option<Value> {
    if let Some(id) = selector.get(ID_FIELD) {
        return docs
            .get(id)
            .filter(|doc| matches(doc, selector))
            .map(|_| id.clone());
    }
    docs.iter()
        .find(|(_, doc)| matches(doc, selector))
        .map(|(id, _)| id.clone())
}

impl Collection for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_one(&self, selector: &Document) -> DocumentResult<Option<Document>> {
        let docs = self.read()?;
        Ok(first_match(&docs, selector).and_then(|id| docs.get(&id).cloned()))
    }

    fn find(&self, selector: &Document) -> DocumentResult<Cursor<'_>> {
        let docs = self.read()?;
        let found: Vec<Document> = docs
            .values()
            .filter(|doc| matches(doc, selector))
            .cloned()
            .collect();
        Ok(Box::new(found.into_iter().map(Ok)))
    }

    fn update(
        &self,
        selector: &Document,
        update: &Update,
        upsert: bool,
    ) -> DocumentResult<UpdateOutcome> {
        update.validate()?;
        let mut docs = self.write()?;
        match first_match(&docs, selector) {
            Some(id) => {
                if let Some(doc) = docs.get_mut(&id) {
                    update.apply(doc, false)?;
                }
                Ok(UpdateOutcome {
                    matched: 1,
                    upserted: false,
                })
            }
            None if upsert => {
                self.insert_new(&mut docs, selector, update)?;
                Ok(UpdateOutcome {
                    matched: 0,
                    upserted: true,
                })
            }
            None => Ok(UpdateOutcome::default()),
        }
    }

    fn remove(&self, selector: &Document) -> DocumentResult<u64> {
        let mut docs = self.write()?;
        let before = docs.len();
        if let Some(id) = selector.get(ID_FIELD) {
            if docs.get(id).is_some_and(|doc| matches(doc, selector)) {
                docs.remove(id);
            }
        } else {
            docs.retain(|_, doc| !matches(doc, selector));
        }
        let removed = (before - docs.len()) as u64;
        if removed > 0 {
            debug!(collection = %self.name, removed, "removed documents");
        }
        Ok(removed)
    }

    fn find_and_modify(
        &self,
        selector: &Document,
        update: &Update,
        return_new: bool,
        upsert: bool,
    ) -> DocumentResult<Option<Document>> {
        update.validate()?;
        let mut docs = self.write()?;
        match first_match(&docs, selector) {
            Some(id) => {
                let Some(doc) = docs.get_mut(&id) else {
                    return Ok(None);
                };
                let before = doc.clone();
                update.apply(doc, false)?;
                Ok(Some(if return_new { doc.clone() } else { before }))
            }
            None if upsert => {
                let inserted = self.insert_new(&mut docs, selector, update)?;
                Ok(return_new.then_some(inserted))
            }
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for InMemoryCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCollection")
            .field("name", &self.name)
            .field("document_count", &self.len())
            .finish()
    }
}

/// In-memory database holding any number of named collections.
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    name: String,
    collections: RwLock<HashMap<String, Arc<InMemoryCollection>>>,
}

impl InMemoryDocumentStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Concrete handle to a collection, creating it if needed.
    pub fn in_memory_collection(&self, name: &str) -> DocumentResult<Arc<InMemoryCollection>> {
        if let Some(existing) = self
            .collections
            .read()
            .map_err(|e| DocumentError::Backend(format!("lock poisoned: {e}")))?
            .get(name)
        {
            return Ok(Arc::clone(existing));
        }
        let mut collections = self
            .collections
            .write()
            .map_err(|e| DocumentError::Backend(format!("lock poisoned: {e}")))?;
        let handle = collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(InMemoryCollection::new(name)));
        Ok(Arc::clone(handle))
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new("git")
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn collection(&self, name: &str) -> DocumentResult<Arc<dyn Collection>> {
        let handle: Arc<dyn Collection> = self.in_memory_collection(name)?;
        Ok(handle)
    }
}
