//! Core type definitions for schema representation.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::SheetQueryError;

/// Textual form used for datetimes in the store and in JSON output.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Inferred semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataKind {
    /// Whole numbers.
    Integer,
    /// Numbers with a fractional part somewhere in the column.
    Real,
    /// Calendar dates and timestamps.
    DateTime,
    /// Anything else.
    Text,
}

impl DataKind {
    /// SQL column type used when creating relations.
    pub const fn as_sql_type(&self) -> &'static str {
        match self {
            DataKind::Integer => "INTEGER",
            DataKind::Real => "REAL",
            DataKind::DateTime => "DATETIME",
            DataKind::Text => "TEXT",
        }
    }

    /// Returns true if this kind is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataKind::Integer | DataKind::Real)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql_type())
    }
}

impl std::str::FromStr for DataKind {
    type Err = SheetQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INTEGER" => Ok(DataKind::Integer),
            "REAL" => Ok(DataKind::Real),
            "DATETIME" => Ok(DataKind::DateTime),
            "TEXT" => Ok(DataKind::Text),
            _ => Err(SheetQueryError::Validation(format!("Unknown data kind: {}", s))),
        }
    }
}

/// A typed, cleaned cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl CellValue {
    /// Returns true for an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(v) => Some(*v as f64),
            CellValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Kind of the value, `None` for nulls.
    pub fn kind(&self) -> Option<DataKind> {
        match self {
            CellValue::Null => None,
            CellValue::Integer(_) => Some(DataKind::Integer),
            CellValue::Real(_) => Some(DataKind::Real),
            CellValue::DateTime(_) => Some(DataKind::DateTime),
            CellValue::Text(_) => Some(DataKind::Text),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Real(v) => write!(f, "{}", v),
            CellValue::DateTime(v) => write!(f, "{}", v.format(DATETIME_FORMAT)),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Integer(v) => serializer.serialize_i64(*v),
            // JSON has no NaN/inf
            CellValue::Real(v) if !v.is_finite() => serializer.serialize_none(),
            CellValue::Real(v) => serializer.serialize_f64(*v),
            CellValue::DateTime(v) => serializer.collect_str(&v.format(DATETIME_FORMAT)),
            CellValue::Text(v) => serializer.serialize_str(v),
        }
    }
}
