//! Keys addressing the DHT tables.
//!
//! Repository-scoped keys render as `<repository>.<digest>`, where the
//! repository part is the eight hex digit form of [`RepositoryKey`]. The
//! `.` in that rendering is why keys must be escaped before they are used
//! as document field names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::object::ObjectId;

/// Separator between the parts of a compound key.
pub const KEY_SEPARATOR: char = '.';

fn invalid(kind: &'static str, key: &str, reason: impl Into<String>) -> TypeError {
    TypeError::InvalidKey {
        kind,
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Integer key allocated to a repository by the repository table's counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryKey(i32);

impl RepositoryKey {
    pub fn from_int(key: i32) -> Self {
        Self(key)
    }

    pub fn as_int(&self) -> i32 {
        self.0
    }

    /// Fixed-width hex rendering used as the prefix of scoped keys.
    pub fn as_string(&self) -> String {
        format!("{:08x}", self.0 as u32)
    }

    pub fn from_string(s: &str) -> TypeResult<Self> {
        if s.len() != 8 {
            return Err(invalid("repository", s, "expected 8 hex digits"));
        }
        let raw = u32::from_str_radix(s, 16).map_err(|e| invalid("repository", s, e.to_string()))?;
        Ok(Self(raw as i32))
    }
}

impl fmt::Display for RepositoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

/// Human-readable repository name, e.g. `"tools/linker.git"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub fn new(name: impl Into<String>) -> TypeResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(invalid("repository name", &name, "must not be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn split_scoped(kind: &'static str, s: &str) -> TypeResult<(RepositoryKey, ObjectId)> {
    let (repo, digest) = s
        .split_once(KEY_SEPARATOR)
        .ok_or_else(|| invalid(kind, s, "missing '.' separator"))?;
    let repo = RepositoryKey::from_string(repo)?;
    let digest = ObjectId::from_hex(digest).map_err(|e| invalid(kind, s, e.to_string()))?;
    Ok((repo, digest))
}

/// Identifies one content chunk within a repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkKey {
    repository: RepositoryKey,
    chunk: ObjectId,
}

impl ChunkKey {
    pub fn new(repository: RepositoryKey, chunk: ObjectId) -> Self {
        Self { repository, chunk }
    }

    pub fn repository(&self) -> RepositoryKey {
        self.repository
    }

    pub fn chunk_hash(&self) -> ObjectId {
        self.chunk
    }

    pub fn as_string(&self) -> String {
        format!("{}{KEY_SEPARATOR}{}", self.repository, self.chunk)
    }

    pub fn from_string(s: &str) -> TypeResult<Self> {
        let (repository, chunk) = split_scoped("chunk", s)?;
        Ok(Self { repository, chunk })
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl FromStr for ChunkKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Identifies an object within a repository's object index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectIndexKey {
    repository: RepositoryKey,
    object: ObjectId,
}

impl ObjectIndexKey {
    pub fn new(repository: RepositoryKey, object: ObjectId) -> Self {
        Self { repository, object }
    }

    pub fn repository(&self) -> RepositoryKey {
        self.repository
    }

    pub fn object_id(&self) -> ObjectId {
        self.object
    }

    pub fn as_string(&self) -> String {
        format!("{}{KEY_SEPARATOR}{}", self.repository, self.object)
    }

    pub fn from_string(s: &str) -> TypeResult<Self> {
        let (repository, object) = split_scoped("object index", s)?;
        Ok(Self { repository, object })
    }
}

impl fmt::Display for ObjectIndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

/// Names one version of a cached pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CachedPackKey {
    name: ObjectId,
    version: ObjectId,
}

impl CachedPackKey {
    pub fn new(name: ObjectId, version: ObjectId) -> Self {
        Self { name, version }
    }

    pub fn name(&self) -> ObjectId {
        self.name
    }

    pub fn version(&self) -> ObjectId {
        self.version
    }

    pub fn as_string(&self) -> String {
        format!("{}{KEY_SEPARATOR}{}", self.name, self.version)
    }

    pub fn from_string(s: &str) -> TypeResult<Self> {
        let (name, version) = s
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| invalid("cached pack", s, "missing '.' separator"))?;
        let name = ObjectId::from_hex(name).map_err(|e| invalid("cached pack", s, e.to_string()))?;
        let version =
            ObjectId::from_hex(version).map_err(|e| invalid("cached pack", s, e.to_string()))?;
        Ok(Self { name, version })
    }
}

impl fmt::Display for CachedPackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

/// A ref name scoped to its repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RefKey {
    repository: RepositoryKey,
    name: String,
}

impl RefKey {
    pub fn create(repository: RepositoryKey, name: impl Into<String>) -> TypeResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(invalid("ref", &name, "name must not be empty"));
        }
        Ok(Self { repository, name })
    }

    pub fn repository(&self) -> RepositoryKey {
        self.repository
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.name)
    }
}
