//! Foundation types for the document-backed object DHT.
//!
//! Every table in `dht-tables` is addressed by one of the keys defined here,
//! and every binary payload it stores is the encoded form of one of the
//! messages defined here. The tables never look inside a payload except
//! through the [`Message`] codec.
//!
//! # Key Types
//!
//! - [`RepositoryKey`] — Integer key allocated for a repository
//! - [`RepositoryName`] — Human-readable repository name
//! - [`ChunkKey`] — Repository-scoped content chunk identifier
//! - [`CachedPackKey`] — Name + version of a cached pack
//! - [`ObjectIndexKey`] — Repository-scoped object identifier
//! - [`RefKey`] — Repository-scoped ref name
//!
//! # Messages
//!
//! - [`ChunkInfo`], [`ChunkMeta`], [`CachedPackInfo`], [`RefData`],
//!   [`ObjectInfo`]

pub mod chunk;
pub mod error;
pub mod keys;
pub mod message;
pub mod object;
pub mod object_info;
pub mod pack;
pub mod refs;

pub use chunk::{BaseChunk, ChunkInfo, ChunkInfoData, ChunkMeta, ChunkRecord, ChunkSource};
pub use error::{TypeError, TypeResult};
pub use keys::{CachedPackKey, ChunkKey, ObjectIndexKey, RefKey, RepositoryKey, RepositoryName};
pub use message::Message;
pub use object::ObjectId;
pub use object_info::{ObjectInfo, ObjectInfoData, ObjectType};
pub use pack::CachedPackInfo;
pub use refs::{RefData, RefTarget};
