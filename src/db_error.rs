//! Error type shared by every layer of the store.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type DbResult<T> = Result<T, DbError>;

/// Errors surfaced by the database handle, the collections and the file store.
///
/// Only setup failures ([`DbError::InvalidPath`], [`DbError::InvalidNames`]) are
/// fatal. Read-side storage failures ([`DbError::NotFound`],
/// [`DbError::Serialization`] while loading) are swallowed by the collection
/// engine and turned into an empty collection.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database root does not exist or is not a directory.
    #[error("the DB path '{}' does not seem to be valid, recheck the path and try again", .path.display())]
    InvalidPath {
        /// The rejected root path.
        path: PathBuf,
    },

    /// The list of collection names handed to the database is malformed.
    #[error("invalid collection names: {0}")]
    InvalidNames(String),

    /// A record did not serialize to a JSON object.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A query was built from something other than a JSON object.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The backing file of a collection is missing.
    #[error("collection file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding failure.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
