//! Field/value queries shared by both matchers.

use serde_json::{Map, Value as JsonValue};

use crate::db_error::{DbError, DbResult};
use crate::document::json_kind;

/// A partial mapping from field name to expected value.
///
/// ```rust
/// use diskdb_core::query::Query;
/// use serde_json::json;
///
/// let query = Query::new().field("num", 1).field("str", "Test #1");
/// assert_eq!(query.len(), 2);
///
/// let same = Query::from_value(json!({"num": 1, "str": "Test #1"}))?;
/// assert_eq!(query, same);
/// # Ok::<(), diskdb_core::DbError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    fields: Map<String, JsonValue>,
}

impl Query {
    /// Creates a query with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builds a query from a JSON object.
    pub fn from_value(value: JsonValue) -> DbResult<Self> {
        match value {
            JsonValue::Object(fields) => Ok(Self { fields }),
            other => Err(DbError::InvalidQuery(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// True when no field is constrained.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of constrained fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Expected value for `name`, if the query constrains that field.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }

    /// Iterates over `(field, expected value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.fields.iter()
    }
}

impl TryFrom<JsonValue> for Query {
    type Error = DbError;

    fn try_from(value: JsonValue) -> DbResult<Self> {
        Self::from_value(value)
    }
}

impl From<Map<String, JsonValue>> for Query {
    fn from(fields: Map<String, JsonValue>) -> Self {
        Self { fields }
    }
}

/// Equality used by both matchers.
///
/// Numbers compare by numeric value so `1` and `1.0` are equal, while two
/// integers must be exactly equal. Every other JSON value compares
/// structurally.
pub fn values_equal(left: &JsonValue, right: &JsonValue) -> bool {
    match (left, right) {
        (JsonValue::Number(a), JsonValue::Number(b)) => {
            if a == b {
                return true;
            }
            // Integers compare exactly; only a float on either side goes through f64.
            if !a.is_f64() && !b.is_f64() {
                return false;
            }
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (JsonValue::Array(a), JsonValue::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (JsonValue::Object(a), JsonValue::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| values_equal(v, other)))
        }
        _ => left == right,
    }
}
