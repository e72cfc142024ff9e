//! Storage tables for a content-addressed object DHT, kept in a document
//! database.
//!
//! Repositories, refs, the object index, and chunks each get one table. A
//! table is a thin mapping from domain operations onto the document
//! primitives of [`dht_document::Collection`]: single-document upserts,
//! sparse-field sets and unsets, and one atomic increment for key allocation.
//!
//! # Record Layout
//!
//! | Table | Collection | Identity | Fields |
//! |-------|------------|----------|--------|
//! | repository index | `repositoryIndex` | repository key | `name` |
//! | repository | `repositories` | repository key | `chunks.*`, `packs.*` |
//! | counter | `repositoryInfo` | `{metadata: 0}` | `key` |
//! | refs | `refs` | generated | `repo`, `name`, `data` |
//! | object index | `objects` | `"<repo>.<object>"` | `values.*` |
//! | chunks | `chunks` | `"<repo>.<chunk>"` | `data`, `index`, `meta` |
//!
//! Domain keys used as field names are escaped (`.` becomes `:`).
//!
//! # Modules
//!
//! - [`error`] — [`DhtError`] and the decode / timeout distinction
//! - [`config`] — [`DatabaseConfig`], loadable from TOML
//! - [`traits`] — the five table contracts
//! - [`schema`] — shared field names
//! - [`database`] — [`Database`], binding the tables to one store
//!
//! # Refs
//!
//! By default [`RefTable::compare_and_put`] and
//! [`RefTable::compare_and_remove`] ignore the expected value and always
//! succeed. Set [`RefUpdateMode::Checked`] to have the store compare it.

pub mod chunk;
pub mod config;
pub mod database;
pub mod error;
pub mod object_index;
pub mod refs;
pub mod repository;
pub mod repository_index;
pub mod schema;
pub mod traits;

pub use chunk::DocChunkTable;
pub use config::{CollectionNames, DatabaseConfig, RefUpdateMode};
pub use database::Database;
pub use error::{DhtError, DhtResult};
pub use object_index::DocObjectIndexTable;
pub use refs::DocRefTable;
pub use repository::DocRepositoryTable;
pub use repository_index::DocRepositoryIndexTable;
pub use traits::{ChunkTable, ObjectIndexTable, RefTable, RepositoryIndexTable, RepositoryTable};
