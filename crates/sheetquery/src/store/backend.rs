//! Relational store trait and query results.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, SheetQueryError};
use crate::inference::is_valid_identifier;
use crate::schema::{CellValue, CleanedColumn};

/// Rows returned by executing SQL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    /// Column names in select order.
    pub columns: Vec<String>,
    /// Row-major values.
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultSet {
    /// Create a result set.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as column-name keyed records, limited to the first `limit` rows.
    pub fn records(&self, limit: usize) -> Vec<IndexMap<String, CellValue>> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}

/// Durable relational store used by the ingestion store and query path.
///
/// Implementations must be thread-safe (Send + Sync). No transactional
/// guarantee across tables is required; each single-table write should be
/// atomic.
pub trait RelationalStore: Send + Sync {
    /// Create the table, discarding any previous table of the same name,
    /// and fill it with exactly `rows`.
    fn replace_table(
        &self,
        name: &str,
        columns: &[CleanedColumn],
        rows: &[Vec<CellValue>],
    ) -> Result<()>;

    /// Append rows, creating the table from `columns` if it does not exist.
    fn append_rows(
        &self,
        name: &str,
        columns: &[CleanedColumn],
        rows: &[Vec<CellValue>],
    ) -> Result<()>;

    /// Check whether a table exists.
    fn table_exists(&self, name: &str) -> Result<bool>;

    /// Execute arbitrary SQL and return its rows.
    fn query(&self, sql: &str) -> Result<ResultSet>;

    /// Get the name of this store (for logging/debugging).
    fn name(&self) -> &str;
}

/// Validate an identifier against `[A-Za-z0-9_]+` and double-quote it.
pub fn quote_identifier(name: &str) -> Result<String> {
    if is_valid_identifier(name) {
        Ok(format!("\"{}\"", name))
    } else {
        Err(SheetQueryError::Validation(format!(
            "Invalid identifier '{}': only letters, digits and '_' are allowed",
            name
        )))
    }
}
