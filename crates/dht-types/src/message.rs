//! Byte codec shared by every payload stored in the tables.
//!
//! Payloads are bincode-encoded serde structs. The tables treat the encoded
//! bytes as opaque; only [`Message::parse_from`] interprets them.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{TypeError, TypeResult};

/// A structured payload with a stable byte encoding.
pub trait Message: Serialize + DeserializeOwned {
    /// Name used in decode errors.
    const NAME: &'static str;

    /// Encode into the stored byte form.
    fn to_bytes(&self) -> TypeResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Decode from the stored byte form.
    fn parse_from(bytes: &[u8]) -> TypeResult<Self> {
        bincode::deserialize(bytes).map_err(|e| TypeError::Deserialization {
            message: Self::NAME,
            reason: e.to_string(),
        })
    }
}
