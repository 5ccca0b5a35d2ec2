//! Per-upload persistence: data tables plus an append-only metadata table.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Result, SheetQueryError};
use crate::inference::{is_valid_identifier, parse_datetime, table_name_for};
use crate::schema::{CellValue, CleanedColumn, CleanedSheet, DataKind};

use super::backend::{quote_identifier, RelationalStore, ResultSet};

/// Suffix of the per-upload metadata table.
pub const METADATA_SUFFIX: &str = "_metadata";

/// Prefix of generated upload identifiers.
pub const UPLOAD_ID_PREFIX: &str = "table_";

/// One row of an upload's metadata table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadMetadataRecord {
    pub table_name: String,
    pub sheet_name: String,
    pub filename: String,
    pub columns: Vec<String>,
    pub dtypes: IndexMap<String, DataKind>,
    pub row_count: usize,
    pub col_count: usize,
    pub created_at: NaiveDateTime,
}

/// Per-sheet part of an upload summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetSummary {
    pub table_name: String,
    /// (rows, columns) after cleaning.
    pub shape: (usize, usize),
    pub columns: Vec<String>,
    pub dtypes: IndexMap<String, DataKind>,
}

/// What an ingestion produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadSummary {
    #[serde(rename = "table_id")]
    pub upload_id: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub sheets: IndexMap<String, SheetSummary>,
    pub upload_time: DateTime<Utc>,
}

/// Generate a fresh upload identifier, `table_` plus 8 random hex digits.
pub fn new_upload_id() -> String {
    format!("{}{:08x}", UPLOAD_ID_PREFIX, fastrand::u32(..))
}

/// Metadata table name for an upload; rejects ids outside `[A-Za-z0-9_]+`.
pub fn metadata_table_for(upload_id: &str) -> Result<String> {
    if !is_valid_identifier(upload_id) {
        return Err(SheetQueryError::Validation(format!(
            "Invalid upload id '{}'",
            upload_id
        )));
    }
    Ok(format!("{}{}", upload_id, METADATA_SUFFIX))
}

/// Reserve a data table name, appending `_2`, `_3`, ... when it is taken.
///
/// `taken` holds lowercased names because SQLite table names are
/// case-insensitive; it is seeded with the metadata table.
fn claim_table_name(base: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.to_ascii_lowercase()) {
        return base;
    }

    let mut n = 2usize;
    loop {
        let candidate = format!("{}_{}", base, n);
        if taken.insert(candidate.to_ascii_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

fn metadata_columns() -> Vec<CleanedColumn> {
    [
        ("table_name", DataKind::Text),
        ("sheet_name", DataKind::Text),
        ("filename", DataKind::Text),
        ("columns", DataKind::Text),
        ("dtypes", DataKind::Text),
        ("row_count", DataKind::Integer),
        ("col_count", DataKind::Integer),
        ("created_at", DataKind::DateTime),
    ]
    .into_iter()
    .enumerate()
    .map(|(position, (name, kind))| CleanedColumn::new(name, kind, position))
    .collect()
}

/// Writes cleaned sheets and their metadata, and reads metadata back.
#[derive(Clone)]
pub struct UploadStore {
    backend: Arc<dyn RelationalStore>,
}

impl UploadStore {
    /// Create an upload store over a relational backend.
    pub fn new(backend: Arc<dyn RelationalStore>) -> Self {
        Self { backend }
    }

    /// The underlying relational store.
    pub fn backend(&self) -> &dyn RelationalStore {
        self.backend.as_ref()
    }

    /// Persist every sheet of an upload.
    ///
    /// Per sheet, in order: replace its data table, then append one metadata
    /// record. Sheets whose names normalize to the same table, or to the
    /// metadata table, get `_2`, `_3`, ... suffixes. Sheets without columns
    /// are skipped. On failure the sheets already written stay committed.
    pub fn persist(
        &self,
        upload_id: &str,
        filename: &str,
        sheets: &IndexMap<String, CleanedSheet>,
    ) -> Result<UploadSummary> {
        let metadata_table = metadata_table_for(upload_id)?;
        let metadata_columns = metadata_columns();
        let mut taken = HashSet::from([metadata_table.to_ascii_lowercase()]);
        let mut summaries = IndexMap::new();

        for (sheet_name, sheet) in sheets {
            if sheet.column_count() == 0 {
                warn!(upload_id, sheet = %sheet_name, "skipping sheet without columns");
                continue;
            }

            let table_name = claim_table_name(table_name_for(upload_id, sheet_name), &mut taken);
            let columns = sheet.column_names();
            let dtypes = sheet.kinds();

            let written = self
                .backend
                .replace_table(&table_name, &sheet.columns, &sheet.rows)
                .and_then(|_| {
                    let record = vec![
                        CellValue::Text(table_name.clone()),
                        CellValue::Text(sheet_name.clone()),
                        CellValue::Text(filename.to_string()),
                        CellValue::Text(serde_json::to_string(&columns)?),
                        CellValue::Text(serde_json::to_string(&dtypes)?),
                        CellValue::Integer(sheet.row_count() as i64),
                        CellValue::Integer(sheet.column_count() as i64),
                        CellValue::DateTime(Utc::now().naive_utc()),
                    ];
                    self.backend
                        .append_rows(&metadata_table, &metadata_columns, &[record])
                });

            if let Err(e) = written {
                warn!(
                    upload_id,
                    sheet = %sheet_name,
                    committed = ?summaries.keys().collect::<Vec<_>>(),
                    "persist failed; earlier sheets remain stored"
                );
                return Err(match e {
                    err @ SheetQueryError::Storage { .. } => err,
                    other => SheetQueryError::storage(&table_name, other),
                });
            }

            summaries.insert(
                sheet_name.clone(),
                SheetSummary {
                    table_name,
                    shape: sheet.shape(),
                    columns,
                    dtypes,
                },
            );
        }

        info!(upload_id, filename, sheets = summaries.len(), "persisted upload");

        Ok(UploadSummary {
            upload_id: upload_id.to_string(),
            filename: filename.to_string(),
            content_hash: None,
            sheets: summaries,
            upload_time: Utc::now(),
        })
    }

    /// All metadata records of an upload, in append order.
    pub fn load_metadata(&self, upload_id: &str) -> Result<Vec<UploadMetadataRecord>> {
        let metadata_table = metadata_table_for(upload_id)?;
        if !self.backend.table_exists(&metadata_table)? {
            return Err(SheetQueryError::NotFound {
                upload_id: upload_id.to_string(),
            });
        }

        let sql = format!(
            "SELECT table_name, sheet_name, filename, columns, dtypes, row_count, col_count, \
             created_at FROM {} ORDER BY rowid",
            quote_identifier(&metadata_table)?
        );
        let result = self
            .backend
            .query(&sql)
            .map_err(|e| SheetQueryError::storage(&metadata_table, e))?;

        result
            .rows
            .iter()
            .map(|row| parse_record(row).map_err(|e| SheetQueryError::storage(&metadata_table, e)))
            .collect()
    }

    /// Run arbitrary SQL against the store.
    pub fn execute(&self, sql: &str) -> Result<ResultSet> {
        self.backend.query(sql)
    }
}

fn parse_record(row: &[CellValue]) -> std::result::Result<UploadMetadataRecord, String> {
    let text = |i: usize| -> std::result::Result<String, String> {
        match row.get(i) {
            Some(CellValue::Text(s)) => Ok(s.clone()),
            Some(CellValue::Null) | None => Ok(String::new()),
            Some(other) => Ok(other.to_string()),
        }
    };
    let count = |i: usize| -> std::result::Result<usize, String> {
        match row.get(i) {
            Some(CellValue::Integer(v)) if *v >= 0 => Ok(*v as usize),
            other => Err(format!("expected a count in column {}, got {:?}", i, other)),
        }
    };

    let columns: Vec<String> =
        serde_json::from_str(&text(3)?).map_err(|e| format!("bad columns JSON: {}", e))?;
    let dtypes: IndexMap<String, DataKind> =
        serde_json::from_str(&text(4)?).map_err(|e| format!("bad dtypes JSON: {}", e))?;
    let created_at = text(7)?;

    Ok(UploadMetadataRecord {
        table_name: text(0)?,
        sheet_name: text(1)?,
        filename: text(2)?,
        columns,
        dtypes,
        row_count: count(5)?,
        col_count: count(6)?,
        created_at: parse_datetime(&created_at)
            .ok_or_else(|| format!("bad created_at '{}'", created_at))?,
    })
}
