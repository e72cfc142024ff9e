use std::collections::BTreeMap;
use std::sync::Arc;

use dht_document::fields::get_string;
use dht_document::{Collection, Document, Update};
use dht_types::{Message, RefData, RefKey, RepositoryKey};
use tracing::debug;

use crate::config::RefUpdateMode;
use crate::error::DhtResult;
use crate::schema::{decode_payload, DATA, NAME, REPO};
use crate::traits::RefTable;

/// Refs stored one record per ref as `{_id, repo, name, data}`.
///
/// `_id` is left to the store; the `(repo, name)` pair is the logical key and
/// is always used as a compound selector.
pub struct DocRefTable {
    collection: Arc<dyn Collection>,
    mode: RefUpdateMode,
}

impl DocRefTable {
    pub fn new(collection: Arc<dyn Collection>, mode: RefUpdateMode) -> Self {
        Self { collection, mode }
    }

    pub fn mode(&self) -> RefUpdateMode {
        self.mode
    }
}

fn ref_selector(key: &RefKey) -> Document {
    Document::new()
        .with(REPO, key.repository().as_int())
        .with(NAME, key.name())
}

impl RefTable for DocRefTable {
    fn get_all(&self, repository: RepositoryKey) -> DhtResult<BTreeMap<RefKey, RefData>> {
        let selector = Document::new().with(REPO, repository.as_int());
        let mut refs = BTreeMap::new();
        for record in self.collection.find(&selector)? {
            let record = record?;
            let name = get_string(&record, NAME).unwrap_or_default();
            let key = RefKey::create(repository, name)?;
            let data: RefData = decode_payload(record.get(DATA), DATA)?;
            refs.insert(key, data);
        }
        Ok(refs)
    }

    fn compare_and_put(
        &self,
        key: &RefKey,
        old: Option<&RefData>,
        new: &RefData,
    ) -> DhtResult<bool> {
        let bytes = new.to_bytes()?;
        match (self.mode, old) {
            (RefUpdateMode::Unconditional, _) => {
                let record = ref_selector(key).with(DATA, bytes);
                self.collection
                    .update(&ref_selector(key), &Update::replace(record), true)?;
                Ok(true)
            }
            (RefUpdateMode::Checked, Some(old)) => {
                let selector = ref_selector(key).with(DATA, old.to_bytes()?);
                let outcome = self
                    .collection
                    .update(&selector, &Update::set(DATA, bytes), false)?;
                if outcome.matched == 0 {
                    debug!(%key, "ref changed underneath; put rejected");
                }
                Ok(outcome.matched > 0)
            }
            (RefUpdateMode::Checked, None) => {
                let outcome = self.collection.update(
                    &ref_selector(key),
                    &Update::set_on_insert(DATA, bytes),
                    true,
                )?;
                if !outcome.upserted {
                    debug!(%key, "ref already exists; create rejected");
                }
                Ok(outcome.upserted)
            }
        }
    }

    fn compare_and_remove(&self, key: &RefKey, old: &RefData) -> DhtResult<bool> {
        match self.mode {
            RefUpdateMode::Unconditional => {
                self.collection.remove(&ref_selector(key))?;
                Ok(true)
            }
            RefUpdateMode::Checked => {
                let selector = ref_selector(key).with(DATA, old.to_bytes()?);
                let removed = self.collection.remove(&selector)?;
                if removed == 0 {
                    debug!(%key, "ref changed underneath; remove rejected");
                }
                Ok(removed > 0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dht_document::InMemoryCollection;
    use dht_types::ObjectId;

    fn table(mode: RefUpdateMode) -> (Arc<InMemoryCollection>, DocRefTable) {
        let collection = Arc::new(InMemoryCollection::new("refs"));
        let table = DocRefTable::new(collection.clone(), mode);
        (collection, table)
    }

    fn key(repo: i32, name: &str) -> RefKey {
        RefKey::create(RepositoryKey::from_int(repo), name).unwrap()
    }

    fn value(tag: &[u8], seq: u64) -> RefData {
        RefData::id(ObjectId::hash(tag), seq)
    }

    #[test]
    fn unconditional_put_ignores_expected_value() {
        let (collection, table) = table(RefUpdateMode::Unconditional);
        let main = key(1, "refs/heads/main");
        assert!(table.compare_and_put(&main, None, &value(b"a", 1)).unwrap());
        // Stale expectation still wins.
        assert!(table
            .compare_and_put(&main, Some(&value(b"zzz", 9)), &value(b"b", 2))
            .unwrap());
        assert_eq!(collection.len(), 1);
        let all = table.get_all(RepositoryKey::from_int(1)).unwrap();
        assert_eq!(all.get(&main), Some(&value(b"b", 2)));
    }

    #[test]
    fn unconditional_remove_always_succeeds() {
        let (collection, table) = table(RefUpdateMode::Unconditional);
        let main = key(1, "refs/heads/main");
        table.compare_and_put(&main, None, &value(b"a", 1)).unwrap();
        assert!(table.compare_and_remove(&main, &value(b"other", 5)).unwrap());
        assert!(collection.is_empty());
        assert!(table.compare_and_remove(&main, &value(b"a", 1)).unwrap());
    }

    #[test]
    fn checked_put_requires_matching_value() {
        let (_, table) = table(RefUpdateMode::Checked);
        let main = key(1, "refs/heads/main");
        assert!(table.compare_and_put(&main, None, &value(b"a", 1)).unwrap());
        assert!(!table
            .compare_and_put(&main, Some(&value(b"x", 1)), &value(b"b", 2))
            .unwrap());
        assert!(table
            .compare_and_put(&main, Some(&value(b"a", 1)), &value(b"b", 2))
            .unwrap());
        let all = table.get_all(RepositoryKey::from_int(1)).unwrap();
        assert_eq!(all.get(&main), Some(&value(b"b", 2)));
    }

    #[test]
    fn checked_create_fails_when_ref_exists() {
        let (collection, table) = table(RefUpdateMode::Checked);
        let main = key(1, "refs/heads/main");
        assert!(table.compare_and_put(&main, None, &value(b"a", 1)).unwrap());
        assert!(!table.compare_and_put(&main, None, &value(b"b", 2)).unwrap());
        assert_eq!(collection.len(), 1);
        let all = table.get_all(RepositoryKey::from_int(1)).unwrap();
        assert_eq!(all.get(&main), Some(&value(b"a", 1)));
    }

    #[test]
    fn checked_update_of_missing_ref_creates_nothing() {
        let (collection, table) = table(RefUpdateMode::Checked);
        let main = key(1, "refs/heads/main");
        assert!(!table
            .compare_and_put(&main, Some(&value(b"a", 1)), &value(b"b", 2))
            .unwrap());
        assert!(collection.is_empty());
    }

    #[test]
    fn checked_remove_requires_matching_value() {
        let (_, table) = table(RefUpdateMode::Checked);
        let main = key(1, "refs/heads/main");
        table.compare_and_put(&main, None, &value(b"a", 1)).unwrap();
        assert!(!table.compare_and_remove(&main, &value(b"x", 1)).unwrap());
        assert!(table.compare_and_remove(&main, &value(b"a", 1)).unwrap());
        assert!(table.get_all(RepositoryKey::from_int(1)).unwrap().is_empty());
    }

    #[test]
    fn get_all_is_scoped_to_repository() {
        let (_, table) = table(RefUpdateMode::Unconditional);
        table.compare_and_put(&key(1, "a"), None, &value(b"1a", 1)).unwrap();
        table.compare_and_put(&key(1, "b"), None, &value(b"1b", 1)).unwrap();
        table.compare_and_put(&key(2, "a"), None, &value(b"2a", 1)).unwrap();

        let one = table.get_all(RepositoryKey::from_int(1)).unwrap();
        assert_eq!(one.len(), 2);
        assert!(one.keys().all(|k| k.repository().as_int() == 1));

        let two = table.get_all(RepositoryKey::from_int(2)).unwrap();
        assert_eq!(two.get(&key(2, "a")), Some(&value(b"2a", 1)));
        assert!(table.get_all(RepositoryKey::from_int(3)).unwrap().is_empty());
    }

    #[test]
    fn symbolic_refs_survive() {
        let (_, table) = table(RefUpdateMode::Unconditional);
        let head = key(1, "HEAD");
        let target = RefData::symbolic("refs/heads/main", 3);
        table.compare_and_put(&head, None, &target).unwrap();
        let all = table.get_all(RepositoryKey::from_int(1)).unwrap();
        assert_eq!(all.get(&head), Some(&target));
    }

    #[test]
    fn record_without_data_fails_get_all() {
        let (collection, table) = table(RefUpdateMode::Unconditional);
        collection
            .update(&ref_selector(&key(1, "broken")), &Update::set(NAME, "broken"), true)
            .unwrap();
        let err = table.get_all(RepositoryKey::from_int(1)).unwrap_err();
        assert!(err.is_decode(), "unexpected error: {err}");
    }

    #[test]
    fn record_without_name_fails_get_all() {
        let (collection, table) = table(RefUpdateMode::Unconditional);
        let bytes = value(b"a", 1).to_bytes().unwrap();
        collection
            .update(&Document::new().with(REPO, 1), &Update::set(DATA, bytes), true)
            .unwrap();
        let err = table.get_all(RepositoryKey::from_int(1)).unwrap_err();
        assert!(err.is_decode(), "unexpected error: {err}");
    }
}
