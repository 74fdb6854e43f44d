//! Document model stored in every collection file.
//!
//! A [`Document`] is an arbitrary JSON object carrying a generated `_id`. It is
//! persisted exactly as its JSON object form, so a collection file is a plain
//! JSON array of these objects.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use crate::db_error::{DbError, DbResult};

/// Name of the identity field every stored document carries.
pub const ID_FIELD: &str = "_id";

/// A JSON object stored in a collection.
///
/// Documents saved through a [`Collection`](crate::collection::Collection)
/// always carry an `_id` field holding 32 lowercase hex characters, a random
/// v4 UUID with its hyphens stripped.
///
/// # Examples
///
/// ```rust
/// use diskdb_core::document::Document;
/// use serde_json::json;
///
/// let doc = Document::from_value(json!({
///     "name": "John Doe",
///     "preferences": { "theme": "dark" }
/// }))?;
///
/// assert_eq!(doc.get("name"), Some(&json!("John Doe")));
/// assert!(doc.id().is_none());
/// # Ok::<(), diskdb_core::DbError>(())
/// ```
///
/// Typed records go in and out through serde:
///
/// ```rust
/// use diskdb_core::document::Document;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Note {
///     title: String,
///     pinned: bool,
/// }
///
/// let doc = Document::from_record(&Note { title: "todo".into(), pinned: true })?;
/// let note: Note = doc.to_record()?;
/// assert!(note.pinned);
/// # Ok::<(), diskdb_core::DbError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, JsonValue>,
}

impl Document {
    /// Creates an empty document without an `_id`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, which must be an object.
    pub fn from_value(value: JsonValue) -> DbResult<Self> {
        match value {
            JsonValue::Object(fields) => Ok(Self { fields }),
            other => Err(DbError::InvalidDocument(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Serializes any record into a document.
    pub fn from_record<T: Serialize + ?Sized>(record: &T) -> DbResult<Self> {
        Self::from_value(serde_json::to_value(record)?)
    }

    /// Deserializes the document into a typed record.
    ///
    /// The `_id` field is part of the object, so records may declare it with
    /// `#[serde(rename = "_id")]` or simply ignore it.
    pub fn to_record<T: DeserializeOwned>(&self) -> DbResult<T> {
        Ok(serde_json::from_value(JsonValue::Object(self.fields.clone()))?)
    }

    /// The document identity, if one has been assigned.
    pub fn id(&self) -> Option<&str> {
        self.fields.get(ID_FIELD).and_then(JsonValue::as_str)
    }

    /// Top-level field lookup.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    /// True when the document has the given top-level key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Sets a top-level field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.fields.insert(key.into(), value)
    }

    /// Borrow the underlying JSON object.
    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.fields
    }

    /// Consumes the document and returns its JSON form.
    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.fields)
    }

    /// Replaces the `_id` with a freshly generated one.
    pub(crate) fn assign_new_id(&mut self) {
        self.fields
            .insert(ID_FIELD.to_string(), JsonValue::String(generate_id()));
    }

    /// Recursively merges `data` into this document.
    ///
    /// Keys of `data` win on conflict. When both sides hold an object under
    /// the same key the two objects are merged recursively; any other value
    /// is overwritten. The `_id` of the document is never touched.
    pub fn merge(&mut self, data: &Document) {
        for (key, value) in &data.fields {
            if key == ID_FIELD {
                continue;
            }
            merge_value(&mut self.fields, key, value);
        }
    }
}

fn merge_value(target: &mut Map<String, JsonValue>, key: &str, value: &JsonValue) {
    match (target.get_mut(key), value) {
        (Some(JsonValue::Object(existing)), JsonValue::Object(incoming)) => {
            for (nested_key, nested_value) in incoming {
                merge_value(existing, nested_key, nested_value);
            }
        }
        _ => {
            target.insert(key.to_string(), value.clone());
        }
    }
}

/// Generates a new document id: a v4 UUID rendered as 32 lowercase hex chars.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// True when `id` has the shape of a generated document id.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == 32 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

impl TryFrom<JsonValue> for Document {
    type Error = DbError;

    fn try_from(value: JsonValue) -> DbResult<Self> {
        Self::from_value(value)
    }
}

impl From<Map<String, JsonValue>> for Document {
    fn from(fields: Map<String, JsonValue>) -> Self {
        Self { fields }
    }
}

impl From<Document> for JsonValue {
    fn from(doc: Document) -> Self {
        doc.into_value()
    }
}
