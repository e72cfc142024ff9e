use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DhtError, DhtResult};

/// How [`RefTable`](crate::RefTable) treats the expected old value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefUpdateMode {
    /// The expected old value is ignored: puts always upsert, removes always
    /// delete, and both report success.
    #[default]
    Unconditional,
    /// The stored value must equal the expected old value. The comparison is
    /// part of the store's selector, so check and write are one atomic step.
    Checked,
}

/// Names of the collections backing each table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionNames {
    pub repository_index: String,
    pub repositories: String,
    /// Holds the repository key counter record.
    pub repository_info: String,
    pub refs: String,
    pub objects: String,
    pub chunks: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            repository_index: "repositoryIndex".into(),
            repositories: "repositories".into(),
            repository_info: "repositoryInfo".into(),
            refs: "refs".into(),
            objects: "objects".into(),
            chunks: "chunks".into(),
        }
    }
}

impl CollectionNames {
    fn all(&self) -> [&str; 6] {
        [
            self.repository_index.as_str(),
            self.repositories.as_str(),
            self.repository_info.as_str(),
            self.refs.as_str(),
            self.objects.as_str(),
            self.chunks.as_str(),
        ]
    }
}

/// Configuration for a [`Database`](crate::Database).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Name of the document database.
    pub database: String,
    pub collections: CollectionNames,
    pub ref_update_mode: RefUpdateMode,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database: "git".into(),
            collections: CollectionNames::default(),
            ref_update_mode: RefUpdateMode::default(),
        }
    }
}

impl DatabaseConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    ///
    /// ```
    /// use dht_tables::{DatabaseConfig, RefUpdateMode};
    ///
    /// let config = DatabaseConfig::from_toml_str(r#"
    ///     database = "mirror"
    ///     ref_update_mode = "checked"
    ///
    ///     [collections]
    ///     refs = "mirror_refs"
    /// "#).unwrap();
    /// assert_eq!(config.collections.refs, "mirror_refs");
    /// assert_eq!(config.collections.chunks, "chunks");
    /// assert_eq!(config.ref_update_mode, RefUpdateMode::Checked);
    /// ```
    pub fn from_toml_str(text: &str) -> DhtResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| DhtError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Every collection name must be non-empty and distinct.
    pub fn validate(&self) -> DhtResult<()> {
        if self.database.is_empty() {
            return Err(DhtError::Config("database name is empty".into()));
        }
        let mut seen = HashSet::new();
        for name in self.collections.all() {
            if name.is_empty() {
                return Err(DhtError::Config("collection name is empty".into()));
            }
            if !seen.insert(name) {
                return Err(DhtError::Config(format!(
                    "collection {name:?} is used by more than one table"
                )));
            }
        }
        Ok(())
    }
}
