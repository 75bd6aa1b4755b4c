//! Record model: field values, generic records, and typed entities.

mod entities;
mod value;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub use entities::{Customer, Product, Shop};
pub use value::{compare_optional, locale_cmp, Value};

/// Named field access shared by generic records and typed entities.
///
/// The list pipeline and screen state only see records through this trait.
pub trait FieldSource {
    /// Returns the value of `name`, or `None` when the record has no such field.
    fn field(&self, name: &str) -> Option<Cow<'_, Value>>;

    /// Returns the record's backend identifier from its `id` field.
    fn record_id(&self) -> Option<RecordId> {
        self.field("id").and_then(|v| RecordId::from_value(&v))
    }
}

/// Backend identifier. The backend sends numbers or strings; both compare by text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl RecordId {
    /// Extracts an id from a field value.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(RecordId::Number(*n as u64)),
            Value::Null => None,
            other => {
                let text = other.display_text();
                if text.is_empty() {
                    None
                } else {
                    Some(RecordId::Text(text.into_owned()))
                }
            }
        }
    }

    /// Returns the id as a field value.
    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Number(n) => Value::from(*n),
            RecordId::Text(s) => Value::Text(s.clone()),
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RecordId::Number(a), RecordId::Number(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Eq for RecordId {}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        s.parse::<u64>()
            .map(RecordId::Number)
            .unwrap_or_else(|_| RecordId::Text(s.to_string()))
    }
}

impl std::str::FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(RecordId::from(s))
    }
}

/// An untyped record: field name to primitive value.
///
/// Nested JSON objects are flattened with dotted keys (`admin.name`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON object.
    ///
    /// # Errors
    /// `CoreError::Validation` when `json` is not an object.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| CoreError::validation("record", "expected a JSON object"))?;
        let mut record = Record::new();
        flatten_into(&mut record.fields, "", object);
        Ok(record)
    }

    /// Builds records from a JSON array of objects.
    pub fn list_from_json(json: &serde_json::Value) -> Result<Vec<Self>> {
        let items = json
            .as_array()
            .ok_or_else(|| CoreError::validation("records", "expected a JSON array"))?;
        items.iter().map(Record::from_json).collect()
    }

    /// Returns a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Sets a field while the record is being built.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns a new record equal to this one with `name` set to `value`.
    ///
    /// The original record is left untouched.
    pub fn with_field(&self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut updated = self.clone();
        updated.insert(name, value);
        updated
    }

    /// Iterates field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldSource for Record {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.fields.get(name).map(Cow::Borrowed)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

fn flatten_into(
    fields: &mut BTreeMap<String, Value>,
    prefix: &str,
    object: &serde_json::Map<String, serde_json::Value>,
) {
    for (key, value) in object {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            serde_json::Value::Object(nested) => flatten_into(fields, &name, nested),
            other => {
                fields.insert(name, Value::from(other));
            }
        }
    }
}
