use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Content digest naming a stored object, chunk, or pack.
///
/// An `ObjectId` is the BLAKE3 hash of the named content. Its hex form is the
/// string used inside chunk, object index, and pack keys, and therefore never
/// contains the `.` separator or the `:` escape placeholder.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId([u8; 32]);

impl ObjectId {
    /// Length of the hex rendering.
    pub const HEX_LEN: usize = 64;

    /// Hash raw content into an `ObjectId`.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Wrap a digest that was computed elsewhere.
    pub fn from_raw(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First four bytes in hex, for log lines.
    pub fn abbreviate(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse the 64-character hex form.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let digest: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| TypeError::InvalidLength {
            expected: 32,
            actual: b.len(),
        })?;
        Ok(Self(digest))
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.abbreviate())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
