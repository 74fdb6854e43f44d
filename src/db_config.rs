//! Serializable description of a database: where it lives and which
//! collections it opens.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::db_error::DbResult;

/// Configuration accepted by [`Database::from_config`](crate::database::Database::from_config).
///
/// ```rust
/// use diskdb_core::db_config::DbConfig;
///
/// let config = DbConfig::from_json_str(r#"{"path": "./data", "collections": ["users", "notes"]}"#)?;
/// assert_eq!(config.collections, vec!["users", "notes"]);
/// # Ok::<(), diskdb_core::DbError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    /// Existing directory holding one `{name}.json` file per collection.
    pub path: PathBuf,
    /// Collection names, with or without a `.json` suffix.
    #[serde(default)]
    pub collections: Vec<String>,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>, collections: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            path: path.into(),
            collections: collections.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json_str(json: &str) -> DbResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
