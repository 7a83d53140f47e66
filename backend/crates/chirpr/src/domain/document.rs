//! Document Model
//!
//! Records in the document store are flat maps from field name to a typed
//! value. Typed entities go in and out through a [`DocumentConverter`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::service::StoreError;

/// Field map of one document
pub type Fields = BTreeMap<String, FieldValue>;

/// A single field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Array(Vec<FieldValue>),
    Map(Fields),
    /// Write-only sentinel: the store substitutes its own clock on commit.
    ServerTimestamp,
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Double(_) => "double",
            FieldValue::String(_) => "string",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::Array(_) => "array",
            FieldValue::Map(_) => "map",
            FieldValue::ServerTimestamp => "server timestamp",
        }
    }

    /// Replace every [`FieldValue::ServerTimestamp`] with `now`
    pub fn resolve_server_timestamps(&mut self, now: DateTime<Utc>) {
        match self {
            FieldValue::ServerTimestamp => *self = FieldValue::Timestamp(now),
            FieldValue::Array(values) => {
                for value in values {
                    value.resolve_server_timestamps(now);
                }
            }
            FieldValue::Map(fields) => {
                for value in fields.values_mut() {
                    value.resolve_server_timestamps(now);
                }
            }
            _ => {}
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Array(values.into_iter().map(FieldValue::String).collect())
    }
}

/// Address of a document: `{collection}/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    pub collection: String,
    pub id: String,
}

impl DocumentPath {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Converts an entity to and from its stored field map
pub trait DocumentConverter {
    type Model;

    fn to_fields(&self, model: &Self::Model) -> Fields;

    /// Decode a stored document; `id` is the document id within its collection.
    fn from_fields(&self, id: &str, fields: &Fields) -> Result<Self::Model, StoreError>;
}

/// Typed, strict-on-type / lenient-on-absence access to a field map.
///
/// A missing field and an explicit `null` are treated alike.
pub struct FieldReader<'a> {
    fields: &'a Fields,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a Fields) -> Self {
        Self { fields }
    }

    fn get(&self, name: &str) -> Option<&'a FieldValue> {
        match self.fields.get(name) {
            None | Some(FieldValue::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn mismatch(name: &str, expected: &str, found: &FieldValue) -> StoreError {
        StoreError::Decode(format!(
            "field `{name}`: expected {expected}, found {}",
            found.type_name()
        ))
    }

    pub fn string(&self, name: &str) -> Result<String, StoreError> {
        self.optional_string(name)?
            .ok_or_else(|| StoreError::Decode(format!("field `{name}` is missing")))
    }

    pub fn optional_string(&self, name: &str) -> Result<Option<String>, StoreError> {
        match self.get(name) {
            None => Ok(None),
            Some(FieldValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(Self::mismatch(name, "string", other)),
        }
    }

    pub fn integer_or(&self, name: &str, default: i64) -> Result<i64, StoreError> {
        match self.get(name) {
            None => Ok(default),
            Some(FieldValue::Integer(i)) => Ok(*i),
            Some(other) => Err(Self::mismatch(name, "integer", other)),
        }
    }

    pub fn optional_timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        match self.get(name) {
            None => Ok(None),
            Some(FieldValue::Timestamp(t)) => Ok(Some(*t)),
            Some(other) => Err(Self::mismatch(name, "timestamp", other)),
        }
    }

    /// Array of strings; missing means empty
    pub fn string_array(&self, name: &str) -> Result<Vec<String>, StoreError> {
        match self.get(name) {
            None => Ok(Vec::new()),
            Some(FieldValue::Array(values)) => values
                .iter()
                .map(|value| match value {
                    FieldValue::String(s) => Ok(s.clone()),
                    other => Err(Self::mismatch(name, "array of strings", other)),
                })
                .collect(),
            Some(other) => Err(Self::mismatch(name, "array", other)),
        }
    }
}
