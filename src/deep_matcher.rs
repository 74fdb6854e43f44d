//! Recursive matcher used by the read paths (`find`, `find_one`).
//!
//! Every value anywhere inside a document may satisfy a query field, and a hit
//! is always attributed to the root document that owns it. Nested objects
//! never carry an identity of their own.
//!
//! The search runs in two phases. First the top-level leaves of every root are
//! tested in file order, and each nested container met on the way is pushed on
//! a stack as a `(node, owning root)` pair. Then the stack is drained LIFO:
//! the most recently discovered container is visited first and its own nested
//! containers go on top. Results are ordered by when their root first matched,
//! so top-level hits come first in file order, followed by nested-only hits in
//! traversal order.
//!
//! After every step the candidate list is corrected against the whole query,
//! which turns the per-leaf OR test into a conjunction.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value as JsonValue};

use crate::document::Document;
use crate::query::{values_equal, Query};

#[derive(Clone, Copy)]
enum Node<'a> {
    Object(&'a Map<String, JsonValue>),
    Array(&'a [JsonValue]),
}

impl<'a> Node<'a> {
    fn of(value: &'a JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(map) => Some(Node::Object(map)),
            JsonValue::Array(items) => Some(Node::Array(items)),
            _ => None,
        }
    }
}

struct DeepSearch<'a> {
    documents: &'a [Document],
    query: &'a Query,
    stack: Vec<(Node<'a>, usize)>,
    seen_ids: HashSet<&'a str>,
    seen_roots: HashSet<usize>,
    /// Roots that matched at least one field, in order of first match.
    candidates: Vec<usize>,
    /// Query fields that found an equal leaf somewhere under each root.
    matched_fields: HashMap<usize, HashSet<&'a str>>,
}

impl<'a> DeepSearch<'a> {
    fn new(documents: &'a [Document], query: &'a Query) -> Self {
        Self {
            documents,
            query,
            stack: Vec::new(),
            seen_ids: HashSet::new(),
            seen_roots: HashSet::new(),
            candidates: Vec::new(),
            matched_fields: HashMap::new(),
        }
    }

    fn run(mut self, multi: bool) -> Vec<usize> {
        let documents = self.documents;

        for (root, doc) in documents.iter().enumerate() {
            self.visit(Node::Object(doc.fields()), root);
            if let Some(first) = self.step_done(multi) {
                return vec![first];
            }
        }

        while let Some((node, root)) = self.stack.pop() {
            self.visit(node, root);
            if let Some(first) = self.step_done(multi) {
                return vec![first];
            }
        }

        self.survivors()
    }

    /// Tests the leaves of `node` and defers its nested containers.
    fn visit(&mut self, node: Node<'a>, root: usize) {
        match node {
            Node::Object(map) => {
                for (key, value) in map {
                    if let Some(child) = Node::of(value) {
                        self.stack.push((child, root));
                        continue;
                    }
                    let hit = self
                        .query
                        .get(key)
                        .is_some_and(|expected| values_equal(value, expected));
                    if hit {
                        self.matched_fields
                            .entry(root)
                            .or_default()
                            .insert(key.as_str());
                        self.add_candidate(root);
                    }
                }
            }
            Node::Array(items) => {
                for item in items {
                    if let Some(child) = Node::of(item) {
                        self.stack.push((child, root));
                    }
                }
            }
        }
    }

    fn add_candidate(&mut self, root: usize) {
        if !self.seen_roots.insert(root) {
            return;
        }
        let documents = self.documents;
        if let Some(id) = documents[root].id() {
            if !self.seen_ids.insert(id) {
                return;
            }
        }
        self.candidates.push(root);
    }

    /// Corrects the candidates after a step. In single mode, returns the
    /// first surviving root once there is one.
    fn step_done(&mut self, multi: bool) -> Option<usize> {
        self.correct();
        if multi {
            None
        } else {
            self.survivors().first().copied()
        }
    }

    /// Drops candidates whose own top-level value contradicts the query.
    /// Such a root can never match, so it leaves the list for good.
    fn correct(&mut self) {
        let corrected: Vec<usize> = self
            .candidates
            .iter()
            .copied()
            .filter(|&root| !self.contradicts(root))
            .collect();
        self.candidates = corrected;
    }

    /// Candidates for which every query field holds: at top level when the
    /// root has the field, somewhere deeper when it does not.
    fn survivors(&self) -> Vec<usize> {
        self.candidates
            .iter()
            .copied()
            .filter(|&root| self.satisfies_all(root))
            .collect()
    }

    fn contradicts(&self, root: usize) -> bool {
        let doc = &self.documents[root];
        self.query.iter().any(|(field, expected)| {
            doc.get(field)
                .is_some_and(|actual| !values_equal(actual, expected))
        })
    }

    fn satisfies_all(&self, root: usize) -> bool {
        let doc = &self.documents[root];
        let matched = self.matched_fields.get(&root);
        self.query.iter().all(|(field, expected)| match doc.get(field) {
            Some(actual) => values_equal(actual, expected),
            None => matched.is_some_and(|fields| fields.contains(field.as_str())),
        })
    }
}

/// Returns the indices of the root documents matching `query`, in traversal
/// order. In single mode (`multi == false`) at most one index is returned.
pub fn find_matches(documents: &[Document], query: &Query, multi: bool) -> Vec<usize> {
    if query.is_empty() {
        return Vec::new();
    }
    DeepSearch::new(documents, query).run(multi)
}
