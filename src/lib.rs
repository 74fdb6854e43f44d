//! # diskdb_core
//!
//! An embedded document store that keeps each collection in a plain JSON file
//! and exposes a MongoDB-like API over it: `find`, `find_one`, `save`,
//! `update`, `remove` and `count`.
//!
//! ## Features
//!
//! - **Zero-server persistence**: one `{name}.json` array per collection
//! - **Schemaless documents**: any JSON object, or any `serde` record
//! - **Deep reads**: `find` matches values anywhere inside a document
//! - **Flat writes**: `update` and `remove` match top-level fields only
//!
//! Every operation reloads the whole file and mutators rewrite it in full.
//! There is no locking, no cache and no transaction support: the store is meant
//! for a single process.
//!
//! ## Quick Start
//!
//! ```no_run
//! use diskdb_core::{Database, Query, UpdateOptions};
//! use serde_json::json;
//!
//! let mut db = Database::connect("./data", ["users"])?;
//! let users = db.collection("users").expect("registered above");
//!
//! let saved = users.save(&json!({"name": "Ada", "role": "admin"}))?;
//! assert_eq!(saved.id().map(str::len), Some(32));
//!
//! let admins = users.find(Some(&Query::new().field("role", "admin")));
//! assert_eq!(admins.len(), 1);
//!
//! users.update(
//!     &Query::new().field("name", "Ada"),
//!     &json!({"role": "owner"}),
//!     UpdateOptions::default(),
//! )?;
//!
//! // Drop the whole collection and detach it from the handle.
//! db.remove("users", None, true)?;
//! assert!(db.collection("users").is_none());
//! # Ok::<(), diskdb_core::DbError>(())
//! ```

pub mod collection;
pub mod database;
pub mod db_config;
pub mod db_error;
pub mod deep_matcher;
pub mod document;
pub mod document_store;
pub mod query;
pub mod shallow_matcher;

pub use crate::collection::{Collection, RemoveResult, UpdateOptions, UpdateResult};
pub use crate::database::Database;
pub use crate::db_config::DbConfig;
pub use crate::db_error::{DbError, DbResult};
pub use crate::document::Document;
pub use crate::query::Query;
