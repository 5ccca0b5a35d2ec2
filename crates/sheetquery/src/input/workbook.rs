//! Workbook reader: splits an uploaded spreadsheet into raw sheets.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Result, SheetQueryError};
use crate::inference::parse_datetime;

use super::source::{RawCell, RawSheet};

/// File extensions accepted at the upload boundary.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".xlsx", ".xls"];

/// Reject any filename that does not carry a recognized spreadsheet extension.
pub fn validate_upload_filename(filename: &str) -> Result<()> {
    let lower = filename.to_ascii_lowercase();
    if ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        Ok(())
    } else {
        Err(SheetQueryError::Validation(
            "Please upload an Excel file (.xlsx or .xls)".to_string(),
        ))
    }
}

/// SHA-256 of the uploaded bytes, `sha256:<hex>`.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

/// Reads workbooks into [`RawSheet`]s.
///
/// The format is detected from the content, so `.xls`, `.xlsx`, `.xlsb` and
/// `.ods` bytes are all accepted here; the extension allow-list lives at the
/// upload boundary.
#[derive(Debug, Clone, Default)]
pub struct WorkbookReader {
    /// Maximum data rows to read per sheet (None = all).
    pub max_rows: Option<usize>,
}

impl WorkbookReader {
    /// Create a reader with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a workbook file from disk.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Vec<RawSheet>> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| SheetQueryError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.read_bytes(&bytes, &filename)
    }

    /// Read every sheet of an in-memory workbook, in workbook order.
    pub fn read_bytes(&self, bytes: &[u8], filename: &str) -> Result<Vec<RawSheet>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| SheetQueryError::ingestion(filename, e))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| SheetQueryError::ingestion(filename, e))?;

            let mut rows = range.rows();
            let headers: Vec<RawCell> = rows
                .next()
                .map(|row| row.iter().map(convert_cell).collect())
                .unwrap_or_default();

            let limit = self.max_rows.unwrap_or(usize::MAX);
            let data: Vec<Vec<RawCell>> = rows
                .take(limit)
                .map(|row| row.iter().map(convert_cell).collect())
                .collect();

            debug!(
                sheet = %name,
                columns = headers.len(),
                rows = data.len(),
                "read sheet"
            );
            sheets.push(RawSheet::new(name, headers, data));
        }

        if sheets.is_empty() {
            return Err(SheetQueryError::ingestion(
                filename,
                "workbook has no worksheets",
            ));
        }

        Ok(sheets)
    }
}

/// Convert a calamine cell into a [`RawCell`].
fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Int(i) => RawCell::Int(*i),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return RawCell::Float(dt.as_f64());
            }
            match dt.as_datetime() {
                Some(value) => RawCell::DateTime(value),
                None => RawCell::Float(dt.as_f64()),
            }
        }
        Data::DateTimeIso(s) => match parse_datetime(s) {
            Some(value) => RawCell::DateTime(value),
            None => RawCell::Text(s.clone()),
        },
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Error(format!("{:?}", e)),
    }
}
