//! Schema and row types for dynamic database introspection
//!
//! These types represent table metadata and row data discovered at runtime.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Information about a single column, as reported by `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,

    /// Declared SQL type (e.g., "INTEGER", "TEXT", "VARCHAR(255)"), may be empty
    pub declared_type: String,

    /// Whether the column carries a NOT NULL constraint
    pub not_null: bool,

    /// Default value expression (if any)
    pub default_value: Option<String>,

    /// Whether this column is part of the primary key
    pub is_primary_key: bool,

    /// 1-based position within the primary key, `None` outside it
    pub primary_key_position: Option<u32>,
}

/// A single scalar value read from a row
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }
}

impl Serialize for ColumnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ColumnValue::Null => serializer.serialize_none(),
            ColumnValue::Integer(value) => serializer.serialize_i64(*value),
            // serde_json writes non-finite floats as null
            ColumnValue::Float(value) => serializer.serialize_f64(*value),
            ColumnValue::Text(value) => serializer.serialize_str(value),
            ColumnValue::Boolean(value) => serializer.serialize_bool(*value),
        }
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Integer(value)
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Float(value)
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        ColumnValue::Boolean(value)
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Text(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_string())
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ColumnValue::Null, Into::into)
    }
}

/// One table row as an ordered column name to value mapping
///
/// Serializes as a JSON object whose keys follow the engine's column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, ColumnValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Append a column; later duplicates of a name are kept as-is
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<ColumnValue>) {
        self.fields.push((column.into(), value.into()));
    }

    /// Look up a value by column name (first match)
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<ColumnValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
