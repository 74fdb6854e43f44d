//! Collection engine: CRUD over one JSON file.
//!
//! Every call reloads the whole backing file, applies one of the two matchers,
//! and, for mutators, writes the full sequence back. Nothing is cached between
//! calls, so two handles on the same file race with last-write-wins.

use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::db_error::{DbError, DbResult};
use crate::deep_matcher;
use crate::document::Document;
use crate::document_store::DocumentStore;
use crate::query::Query;
use crate::shallow_matcher;

/// Options for [`Collection::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Merge into every match instead of only the highest-index one.
    pub multi: bool,
    /// Insert the update data as a new document when nothing matches.
    pub upsert: bool,
}

impl UpdateOptions {
    pub fn new(multi: bool, upsert: bool) -> Self {
        Self { multi, upsert }
    }

    /// Update every matching document.
    pub fn multi() -> Self {
        Self::new(true, false)
    }

    /// Insert when nothing matches.
    pub fn upsert() -> Self {
        Self::new(false, true)
    }
}

/// Counts reported by [`Collection::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub updated: usize,
    pub inserted: usize,
}

/// Outcome of [`Collection::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveResult {
    /// Matching documents were deleted from the file.
    Removed(usize),
    /// The backing file was deleted; the handle should leave its registry.
    Dropped,
}

impl RemoveResult {
    /// Number of documents removed by a filtered remove, 0 for a drop.
    pub fn removed(&self) -> usize {
        match self {
            RemoveResult::Removed(count) => *count,
            RemoveResult::Dropped => 0,
        }
    }
}

/// Handle on one named collection stored at `{root}/{name}.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    name: String,
    store: DocumentStore,
}

impl Collection {
    pub fn new(name: impl Into<String>, root: &Path) -> Self {
        let name = name.into();
        let store = DocumentStore::new(root.join(format!("{name}.json")));
        Self { name, store }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub(crate) fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Reads the backing file, treating any read failure as an empty collection.
    fn load(&self) -> Vec<Document> {
        match self.store.read() {
            Ok(documents) => documents,
            Err(DbError::NotFound(path)) => {
                debug!("Collection '{}' has no file at {}", self.name, path.display());
                Vec::new()
            }
            Err(e) => {
                warn!(
                    "Collection '{}' could not be read, treating it as empty: {e}",
                    self.name
                );
                Vec::new()
            }
        }
    }

    /// Returns every document when `query` is absent or empty, otherwise all
    /// documents the deep matcher attributes a match to.
    pub fn find(&self, query: Option<&Query>) -> Vec<Document> {
        let documents = self.load();

        let query = match query {
            Some(query) if !query.is_empty() => query,
            _ => return documents,
        };

        let found: Vec<Document> = deep_matcher::find_matches(&documents, query, true)
            .into_iter()
            .map(|index| documents[index].clone())
            .collect();
        debug!("find on '{}' matched {} document(s)", self.name, found.len());
        found
    }

    /// Without a query, the first document in file order. With a query, the
    /// first document the deep matcher accepts.
    pub fn find_one(&self, query: Option<&Query>) -> Option<Document> {
        let mut documents = self.load();

        match query {
            None => {
                if documents.is_empty() {
                    None
                } else {
                    Some(documents.swap_remove(0))
                }
            }
            Some(query) => deep_matcher::find_matches(&documents, query, false)
                .first()
                .map(|&index| documents.swap_remove(index)),
        }
    }

    /// Stores one record under a freshly generated `_id`.
    ///
    /// Any `_id` the record already carries is overwritten.
    pub fn save<T: Serialize + ?Sized>(&self, record: &T) -> DbResult<Document> {
        let mut doc = Document::from_record(record)?;
        doc.assign_new_id();

        let mut documents = self.load();
        documents.push(doc.clone());
        self.store.write(&documents)?;

        debug!("Saved document {:?} into '{}'", doc.id(), self.name);
        Ok(doc)
    }

    /// Stores several records with one file write.
    ///
    /// Records are appended last-to-first: the final element of `records` is
    /// persisted first, and the returned documents follow that same order.
    pub fn save_many<T: Serialize>(&self, records: &[T]) -> DbResult<Vec<Document>> {
        let mut saved = records
            .iter()
            .map(Document::from_record)
            .collect::<DbResult<Vec<_>>>()?;
        saved.reverse();
        for doc in &mut saved {
            doc.assign_new_id();
        }

        let mut documents = self.load();
        documents.extend(saved.iter().cloned());
        self.store.write(&documents)?;

        debug!("Saved {} document(s) into '{}'", saved.len(), self.name);
        Ok(saved)
    }

    /// Merges `data` into the documents the shallow matcher selects.
    ///
    /// Without `multi` only the highest-index match is touched. With `upsert`
    /// and no match, `data` is appended as a new document. The file is
    /// rewritten even when nothing changed.
    pub fn update<T: Serialize + ?Sized>(
        &self,
        query: &Query,
        data: &T,
        options: UpdateOptions,
    ) -> DbResult<UpdateResult> {
        let mut data = Document::from_record(data)?;
        let mut documents = self.load();
        let matched = shallow_matcher::find_matches(&documents, query, true);

        let result = match matched.first() {
            Some(&highest) if !options.multi => {
                documents[highest].merge(&data);
                UpdateResult {
                    updated: 1,
                    inserted: 0,
                }
            }
            Some(_) => {
                for &index in &matched {
                    documents[index].merge(&data);
                }
                UpdateResult {
                    updated: matched.len(),
                    inserted: 0,
                }
            }
            None if options.upsert => {
                data.assign_new_id();
                documents.push(data);
                UpdateResult {
                    updated: 0,
                    inserted: 1,
                }
            }
            None => UpdateResult::default(),
        };

        self.store.write(&documents)?;
        debug!(
            "update on '{}': {} updated, {} inserted",
            self.name, result.updated, result.inserted
        );
        Ok(result)
    }

    /// Deletes matching documents, or the whole collection file when `query`
    /// is `None`.
    ///
    /// Matches come from the shallow matcher: with `multi` every match is
    /// deleted, otherwise only the highest-index one. Dropping the file does
    /// not detach this handle from its [`Database`](crate::database::Database);
    /// go through [`Database::remove`](crate::database::Database::remove) for
    /// that.
    pub fn remove(&self, query: Option<&Query>, multi: bool) -> DbResult<RemoveResult> {
        let Some(query) = query else {
            match self.store.delete() {
                Ok(()) | Err(DbError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
            info!("Dropped collection '{}'", self.name);
            return Ok(RemoveResult::Dropped);
        };

        if !self.store.exists() {
            return Ok(RemoveResult::Removed(0));
        }

        let mut documents = self.load();
        // Descending, so earlier removals never shift later indices.
        let matched = shallow_matcher::find_matches(&documents, query, multi);
        for &index in &matched {
            documents.remove(index);
        }

        self.store.write(&documents)?;
        debug!("Removed {} document(s) from '{}'", matched.len(), self.name);
        Ok(RemoveResult::Removed(matched.len()))
    }

    /// Number of stored documents; 0 when the file is missing or unreadable.
    pub fn count(&self) -> usize {
        self.load().len()
    }
}
