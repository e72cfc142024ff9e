//! Document model and driver contract for the DHT tables.
//!
//! The tables in `dht-tables` store their records in a schema-flexible
//! document database. This crate defines the slice of such a database they
//! rely on, and nothing more:
//!
//! - [`Document`] / [`Value`] — records and field values, including binary
//! - [`fields`] — typed field readers that degrade to "absent"
//! - [`Update`] — partial updates (set, unset, increment, set-on-insert)
//! - [`escape`] — making domain keys safe to use as field names
//! - [`id`] — the `_id` identity convention
//! - [`Collection`] / [`DocumentStore`] — the primitives a backend provides
//!
//! # Storage Backends
//!
//! - [`InMemoryDocumentStore`] — lock-protected maps, for tests and embedding
//!
//! # Update Rules
//!
//! 1. A partial update touches only the field paths it names.
//! 2. Each primitive is atomic with respect to one document.
//! 3. `find_and_modify` reads, updates, and returns in one step.
//! 4. Nothing spans more than one document.

pub mod error;
pub mod escape;
pub mod fields;
pub mod id;
pub mod memory;
pub mod traits;
pub mod update;
pub mod value;

pub use error::{DocumentError, DocumentResult};
pub use escape::{escape_key, field_path, unescape_key};
pub use id::{by_id, ID_FIELD};
pub use memory::{InMemoryCollection, InMemoryDocumentStore};
pub use traits::{Collection, Cursor, DocumentStore, UpdateOutcome};
pub use update::{FieldOp, Update};
pub use value::{Document, Value, PATH_SEPARATOR};
