//! Type definitions for the SQL service.
//!
//! Contains the value, row and column-description types returned by the
//! read and schema operations.

use rusqlite::types::ValueRef;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// SQL value read from a result set.
///
/// Mirrors SQLite's storage classes. Serializes to the plain JSON value;
/// blobs are rendered as (lossy) UTF-8 text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL value
    Null,
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Real(f64),
    /// UTF-8 text string
    Text(String),
    /// Binary blob data
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for Value {
    fn from(value_ref: ValueRef<'_>) -> Self {
        match value_ref {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(r) => Self::Real(r),
            ValueRef::Text(t) => Self::Text(String::from_utf8_lossy(t).to_string()),
            ValueRef::Blob(b) => Self::Blob(b.to_vec()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Real(r) => serializer.serialize_f64(*r),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Blob(b) => serializer.serialize_str(&String::from_utf8_lossy(b)),
        }
    }
}

/// A single row returned from a SQL query.
///
/// Holds column names and their values in result-set order. Serializes as a
/// JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Column names in order
    pub columns: Vec<String>,
    /// Values in same order as columns
    pub values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given columns and values.
    ///
    /// # Panics
    ///
    /// Panics if `columns.len()` != `values.len()`.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        assert_eq!(
            columns.len(),
            values.len(),
            "Column count ({}) must match value count ({})",
            columns.len(),
            values.len()
        );
        Self { columns, values }
    }

    /// Iterates over (column, value) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Schema information for one table column.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub not_null: bool,
    /// Default value expression, as stored in the schema.
    pub default: Value,
    pub primary_key: bool,
}
