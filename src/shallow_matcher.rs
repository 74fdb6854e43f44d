//! Flat matcher used by the write paths (`update`, `remove`).
//!
//! Only top-level fields are compared and a document qualifies when ANY query
//! field is present with an equal value. No conjunction is enforced here,
//! unlike the deep matcher used by reads.

use crate::document::Document;
use crate::query::{values_equal, Query};

/// Returns the indices of matching documents, walking from the last document
/// to the first. The result is therefore in descending index order.
///
/// With `multi == false` the walk stops at the first hit, which is the
/// highest-index match.
pub fn find_matches(documents: &[Document], query: &Query, multi: bool) -> Vec<usize> {
    let mut matched = Vec::new();

    for (index, doc) in documents.iter().enumerate().rev() {
        if !is_candidate(doc, query) {
            continue;
        }
        matched.push(index);
        if !multi {
            break;
        }
    }

    matched
}

/// OR test across the query fields.
pub fn is_candidate(doc: &Document, query: &Query) -> bool {
    query.iter().any(|(field, expected)| {
        doc.get(field)
            .is_some_and(|actual| values_equal(actual, expected))
    })
}
