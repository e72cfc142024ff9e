use std::sync::Arc;

use crate::error::DocumentResult;
use crate::update::Update;
use crate::value::Document;

/// Lazily produced query results.
pub type Cursor<'a> = Box<dyn Iterator<Item = DocumentResult<Document>> + Send + 'a>;

/// What an [`Collection::update`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Number of existing documents the selector matched (0 or 1).
    pub matched: u64,
    /// Whether a new document was inserted because nothing matched.
    pub upserted: bool,
}

/// One named collection of documents.
///
/// Selectors are documents of `path -> value` pairs; a document matches when
/// every path resolves to an equal value. Every primitive is atomic with
/// respect to a single document and nothing more:
/// - Two updates addressing different fields of one document both land.
/// - `find_and_modify` reads, modifies, and returns without interleaving.
/// - Multi-document reads are not snapshots.
///
/// When an upsert inserts, the new document starts from the selector's
/// fields (plus a generated `_id` if the selector has none) and then has the
/// update applied with set-on-insert operators enabled.
pub trait Collection: Send + Sync {
    /// Collection name, for diagnostics.
    fn name(&self) -> &str;

    /// First document matching `selector`.
    fn find_one(&self, selector: &Document) -> DocumentResult<Option<Document>>;

    /// All documents matching `selector`.
    fn find(&self, selector: &Document) -> DocumentResult<Cursor<'_>>;

    /// Apply `update` to the first match, or insert when `upsert` is set and
    /// nothing matched.
    fn update(
        &self,
        selector: &Document,
        update: &Update,
        upsert: bool,
    ) -> DocumentResult<UpdateOutcome>;

    /// Remove every match. Returns the number of documents removed.
    fn remove(&self, selector: &Document) -> DocumentResult<u64>;

    /// Atomically apply `update` to the first match and return it, either
    /// as it was before (`return_new == false`) or after the update.
    ///
    /// Returns `Ok(None)` when nothing matched and `upsert` is false, or when
    /// an upsert inserted and `return_new` is false.
    fn find_and_modify(
        &self,
        selector: &Document,
        update: &Update,
        return_new: bool,
        upsert: bool,
    ) -> DocumentResult<Option<Document>>;
}

/// A database: a namespace of collections.
pub trait DocumentStore: Send + Sync {
    /// Database name.
    fn name(&self) -> &str;

    /// Handle to the named collection. Collections spring into existence on
    /// first use.
    fn collection(&self, name: &str) -> DocumentResult<Arc<dyn Collection>>;
}
