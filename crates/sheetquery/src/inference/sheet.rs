//! Sheet-level schema inference: raw sheet in, cleaned typed sheet out.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::input::{RawCell, RawSheet, WorkbookReader};
use crate::schema::{CellValue, CleanedColumn, CleanedSheet, DataKind};

use super::kind::{infer_kind, parse_integer, parse_numeric, parse_temporal};
use super::naming::{clean_name, dedupe_names};

/// Text values rewritten to null after trimming. Exact, case-sensitive.
pub const NULL_SENTINELS: &[&str] = &["", "nan", "None", "null"];

/// Turns raw sheets into cleaned, typed sheets.
///
/// Stateless apart from the workbook reader settings; every call returns
/// freshly built values.
#[derive(Debug, Clone, Default)]
pub struct SchemaInferencer {
    reader: WorkbookReader,
}

impl SchemaInferencer {
    /// Create an inferencer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inferencer with a custom workbook reader.
    pub fn with_reader(reader: WorkbookReader) -> Self {
        Self { reader }
    }

    /// Read a workbook and clean every sheet, keyed by sheet name in
    /// workbook order.
    pub fn process_workbook(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<IndexMap<String, CleanedSheet>> {
        let raw_sheets = self.reader.read_bytes(bytes, filename)?;
        Ok(raw_sheets
            .iter()
            .map(|sheet| (sheet.name.clone(), self.process_sheet(sheet)))
            .collect())
    }

    /// Clean one sheet.
    ///
    /// Column names are sanitized in place, fully blank rows are dropped,
    /// text cells are trimmed with null sentinels rewritten, then each
    /// column's kind is inferred and its values converted to that kind.
    pub fn process_sheet(&self, sheet: &RawSheet) -> CleanedSheet {
        let names = dedupe_names(
            sheet
                .headers
                .iter()
                .map(|h| clean_name(h.label().as_deref()))
                .collect(),
        );

        let rows: Vec<Vec<RawCell>> = sheet
            .rows
            .iter()
            .filter(|row| !row.iter().all(RawCell::is_blank))
            .map(|row| row.iter().map(clean_cell).collect())
            .collect();

        let columns: Vec<CleanedColumn> = names
            .into_iter()
            .enumerate()
            .map(|(position, name)| {
                let kind = infer_kind(rows.iter().filter_map(|row| row.get(position)));
                CleanedColumn::new(name, kind, position)
            })
            .collect();

        let values: Vec<Vec<CellValue>> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&columns)
                    .map(|(cell, column)| convert_cell(cell, column.kind))
                    .collect()
            })
            .collect();

        debug!(
            sheet = %sheet.name,
            raw_rows = sheet.row_count(),
            rows = values.len(),
            columns = columns.len(),
            "processed sheet"
        );

        CleanedSheet::new(columns, values)
    }
}

/// Trim text and map null sentinels and formula errors to empty.
fn clean_cell(cell: &RawCell) -> RawCell {
    match cell {
        RawCell::Text(s) => {
            let trimmed = s.trim();
            if NULL_SENTINELS.contains(&trimmed) {
                RawCell::Empty
            } else {
                RawCell::Text(trimmed.to_string())
            }
        }
        RawCell::Error(_) => RawCell::Empty,
        other => other.clone(),
    }
}

/// Convert a cleaned raw cell into a value of the column's kind.
fn convert_cell(cell: &RawCell, kind: DataKind) -> CellValue {
    if matches!(cell, RawCell::Empty) {
        return CellValue::Null;
    }

    let value = match kind {
        DataKind::Integer => parse_integer(cell).map(CellValue::Integer),
        DataKind::Real => parse_numeric(cell).map(CellValue::Real),
        DataKind::DateTime => parse_temporal(cell).map(CellValue::DateTime),
        DataKind::Text => Some(CellValue::Text(cell.render())),
    };
    value.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_sheet(headers: &[&str], rows: &[&[&str]]) -> RawSheet {
        RawSheet::new(
            "Sheet1",
            headers.iter().map(|h| RawCell::text(*h)).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| RawCell::text(*v)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_drops_fully_blank_rows() {
        let mut sheet = text_sheet(&["a", "b"], &[&["1", "x"], &["2", "y"], &["3", "z"]]);
        sheet.rows.insert(1, vec![RawCell::Empty, RawCell::text("  ")]);

        let cleaned = SchemaInferencer::new().process_sheet(&sheet);
        assert_eq!(cleaned.row_count(), 3);
        assert_eq!(cleaned.column_count(), 2);
    }

    #[test]
    fn test_one_blank_row_among_three() {
        let sheet = RawSheet::new(
            "s",
            vec![RawCell::text("v")],
            vec![
                vec![RawCell::Int(1)],
                vec![RawCell::Empty],
                vec![RawCell::Int(2)],
            ],
        );
        let cleaned = SchemaInferencer::new().process_sheet(&sheet);
        assert_eq!(cleaned.row_count(), 2);
    }

    #[test]
    fn test_null_sentinels() {
        let sheet = text_sheet(
            &["label"],
            &[&["nan"], &["None"], &["null"], &[" None "], &["NONE"], &["ok"]],
        );
        let cleaned = SchemaInferencer::new().process_sheet(&sheet);
        let values: Vec<&CellValue> = cleaned.column_values(0).collect();

        assert!(values[0].is_null());
        assert!(values[1].is_null());
        assert!(values[2].is_null());
        assert!(values[3].is_null());
        assert_eq!(values[4], &CellValue::Text("NONE".to_string()));
        assert_eq!(values[5], &CellValue::Text("ok".to_string()));
    }

    #[test]
    fn test_sentinel_row_is_kept_but_nulled() {
        let sheet = text_sheet(&["a"], &[&["null"], &["1"]]);
        let cleaned = SchemaInferencer::new().process_sheet(&sheet);
        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(cleaned.columns[0].kind, DataKind::Integer);
        assert_eq!(cleaned.rows[0][0], CellValue::Null);
        assert_eq!(cleaned.rows[1][0], CellValue::Integer(1));
    }

    #[test]
    fn test_kinds_and_conversion() {
        let sheet = text_sheet(
            &["Date", "Amount", "Units", "Region"],
            &[
                &["2024-01-01", "10.5", "3", " North "],
                &["2024-01-02", "20", "4", "South"],
            ],
        );
        let cleaned = SchemaInferencer::new().process_sheet(&sheet);
        let kinds: Vec<DataKind> = cleaned.columns.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![DataKind::DateTime, DataKind::Real, DataKind::Integer, DataKind::Text]
        );
        assert_eq!(cleaned.rows[1][1], CellValue::Real(20.0));
        assert_eq!(cleaned.rows[0][2], CellValue::Integer(3));
        assert_eq!(cleaned.rows[0][3], CellValue::Text("North".to_string()));
    }

    #[test]
    fn test_column_names_cleaned_and_unique() {
        let sheet = RawSheet::new(
            "s",
            vec![
                RawCell::text("Total ($)"),
                RawCell::Empty,
                RawCell::text("Total"),
                RawCell::text("Unnamed: 3"),
            ],
            vec![vec![RawCell::Int(1); 4]],
        );
        let cleaned = SchemaInferencer::new().process_sheet(&sheet);
        let names = cleaned.column_names();

        assert_eq!(names[0], "Total_");
        assert!(names[1].starts_with("Column_"));
        assert_eq!(names[2], "Total");
        assert!(names[3].starts_with("Column_"));
        let positions: Vec<usize> = cleaned.columns.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_text_column_renders_numbers() {
        let sheet = RawSheet::new(
            "s",
            vec![RawCell::text("code")],
            vec![
                vec![RawCell::Float(12.0)],
                vec![RawCell::text("A7")],
                vec![RawCell::Bool(true)],
            ],
        );
        let cleaned = SchemaInferencer::new().process_sheet(&sheet);
        assert_eq!(cleaned.columns[0].kind, DataKind::Text);
        assert_eq!(cleaned.rows[0][0], CellValue::Text("12".to_string()));
        assert_eq!(cleaned.rows[2][0], CellValue::Text("true".to_string()));
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = RawSheet::new("empty", Vec::new(), Vec::new());
        let cleaned = SchemaInferencer::new().process_sheet(&sheet);
        assert_eq!(cleaned.shape(), (0, 0));
    }
}
