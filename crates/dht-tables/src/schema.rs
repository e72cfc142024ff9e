//! Field names shared by the document tables, and payload decoding.

use dht_document::Value;
use dht_types::{Message, TypeError};

use crate::error::DhtResult;

/// Repository name (repository index) or ref name (refs).
pub const NAME: &str = "name";
/// Owning repository key of a ref record.
pub const REPO: &str = "repo";
/// Ref value or chunk payload.
pub const DATA: &str = "data";
/// Chunk index bytes.
pub const INDEX: &str = "index";
/// Encoded chunk metadata.
pub const META: &str = "meta";
/// Object index sparse map: escaped chunk key -> object info.
pub const VALUES: &str = "values";
/// Repository sparse map: escaped chunk key -> chunk info.
pub const CHUNKS: &str = "chunks";
/// Repository sparse map: escaped pack key -> cached pack info.
pub const PACKS: &str = "packs";
/// Counter value of the repository counter record.
pub const KEY: &str = "key";
/// Selector field of the repository counter record.
pub const METADATA: &str = "metadata";

/// Decode a binary field as `M`. A missing or non-binary field is a decode
/// error, the same as bytes that fail to parse.
pub(crate) fn decode_payload<M: Message>(value: Option<&Value>, field: &str) -> DhtResult<M> {
    let bytes = value
        .and_then(Value::as_bytes)
        .ok_or_else(|| TypeError::Deserialization {
            message: M::NAME,
            reason: format!("field {field:?} is missing or not binary"),
        })?;
    Ok(M::parse_from(bytes)?)
}
