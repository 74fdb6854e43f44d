//! Database handle: validates the root directory and owns the registry of
//! collections by name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::collection::{Collection, RemoveResult};
use crate::db_config::DbConfig;
use crate::db_error::{DbError, DbResult};
use crate::query::Query;

const FILE_SUFFIX: &str = ".json";

/// An open database rooted at a directory.
///
/// The handle is an ordinary value owned by the caller. Dropping a collection
/// through [`Database::remove`] takes it out of the registry until it is
/// loaded again with [`Database::load_collections`].
#[derive(Debug, Clone)]
pub struct Database {
    root: PathBuf,
    collections: BTreeMap<String, Collection>,
}

impl Database {
    /// Opens the database at `root` and registers `names`.
    ///
    /// `root` must be an existing directory. Each collection missing a file
    /// gets an empty one.
    pub fn connect<I, S>(root: impl AsRef<Path>, names: I) -> DbResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = root.as_ref();
        if !root.is_dir() {
            let err = DbError::InvalidPath {
                path: root.to_path_buf(),
            };
            warn!("{err}");
            return Err(err);
        }
        info!("Successfully connected to {}", root.display());

        let mut db = Self {
            root: root.to_path_buf(),
            collections: BTreeMap::new(),
        };
        db.load_collections(names)?;
        Ok(db)
    }

    pub fn from_config(config: &DbConfig) -> DbResult<Self> {
        Self::connect(&config.path, &config.collections)
    }

    /// Registers collections by name, creating `[]` files where none exist.
    ///
    /// A trailing `.json` on a name is ignored. The list must be non-empty and
    /// contain no empty names; it is validated in full before any file is
    /// touched.
    pub fn load_collections<I, S>(&mut self, names: I) -> DbResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = normalize_names(names)?;

        for name in names {
            let collection = Collection::new(name.clone(), &self.root);
            if !collection.store().exists() {
                collection.store().create_empty()?;
                info!("Created collection file {}", collection.path().display());
            }
            self.collections.insert(name, collection);
        }

        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// Registered collection names, sorted.
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    /// Runs [`Collection::remove`] on `name`, detaching the collection from
    /// the registry when the call dropped its file.
    ///
    /// Returns `None` when `name` is not registered.
    pub fn remove(
        &mut self,
        name: &str,
        query: Option<&Query>,
        multi: bool,
    ) -> DbResult<Option<RemoveResult>> {
        let Some(collection) = self.collections.get(name) else {
            return Ok(None);
        };

        let result = collection.remove(query, multi)?;
        if result == RemoveResult::Dropped {
            self.collections.remove(name);
            info!("Detached collection '{name}'");
        }
        Ok(Some(result))
    }
}

fn normalize_names<I, S>(names: I) -> DbResult<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<String> = names
        .into_iter()
        .map(|name| {
            let name = name.as_ref();
            name.strip_suffix(FILE_SUFFIX).unwrap_or(name).to_string()
        })
        .collect();

    if names.is_empty() {
        return Err(DbError::InvalidNames(
            "expected format: ['collection1', 'collection2', ...]".to_string(),
        ));
    }
    if let Some(position) = names.iter().position(|name| name.is_empty()) {
        return Err(DbError::InvalidNames(format!(
            "collection name at position {position} is empty"
        )));
    }

    Ok(names)
}
