//! Cleaned sheet: typed columns plus a rectangular value matrix.

use indexmap::IndexMap;

use super::column::CleanedColumn;
use super::types::{CellValue, DataKind};

/// Output of schema inference for one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSheet {
    /// Columns in source order.
    pub columns: Vec<CleanedColumn>,
    /// Row-major values; every row has `columns.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl CleanedSheet {
    /// Create a cleaned sheet.
    pub fn new(columns: Vec<CleanedColumn>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Column name to kind, in column order.
    pub fn kinds(&self) -> IndexMap<String, DataKind> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.kind))
            .collect()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}
