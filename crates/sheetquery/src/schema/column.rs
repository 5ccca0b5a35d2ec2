//! Cleaned column definition.

use serde::{Deserialize, Serialize};

use super::types::DataKind;

/// A sanitized, typed column of a cleaned sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedColumn {
    /// Sanitized name, unique within its sheet.
    pub name: String,
    /// Inferred kind.
    pub kind: DataKind,
    /// Zero-based position in the source sheet.
    pub position: usize,
}

impl CleanedColumn {
    /// Create a new column.
    pub fn new(name: impl Into<String>, kind: DataKind, position: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
        }
    }
}
