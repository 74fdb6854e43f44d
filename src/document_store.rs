//! Raw file access for one collection: a single JSON array per file.
//!
//! Writes replace the whole file in place. There is no temp-file-and-rename
//! step, so a crash mid-write can leave a truncated file behind; readers then
//! see a parse error, which the collection engine treats as an empty
//! collection.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::db_error::{DbError, DbResult};
use crate::document::Document;

/// File backing a single collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads every document of the file.
    ///
    /// A missing file yields [`DbError::NotFound`], a file that is not a JSON
    /// array of objects yields [`DbError::Serialization`].
    pub fn read(&self) -> DbResult<Vec<Document>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DbError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Serializes `documents` as a compact JSON array, replacing the file.
    pub fn write(&self, documents: &[Document]) -> DbResult<()> {
        let json = serde_json::to_string(documents)?;
        fs::write(&self.path, json)?;
        debug!(
            "Wrote {} document(s) to {}",
            documents.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Writes an empty array.
    pub fn create_empty(&self) -> DbResult<()> {
        self.write(&[])
    }

    pub fn delete(&self) -> DbResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(DbError::NotFound(self.path.clone())),
            Err(e) => Err(e.into()),
        }
    }
}
