//! Raw sheet representation and upload metadata.

use chrono::NaiveDateTime;

use crate::schema::DATETIME_FORMAT;

/// A raw spreadsheet cell of unknown semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Formula error such as `#DIV/0!`.
    Error(String),
}

impl RawCell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        RawCell::Text(value.into())
    }

    /// Returns true for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as a column label; `None` when there is nothing to show.
    pub fn label(&self) -> Option<String> {
        match self {
            RawCell::Empty | RawCell::Error(_) => None,
            other => Some(other.render()),
        }
    }

    /// Textual rendering of the cell.
    ///
    /// Integral floats drop their trailing `.0`, so a header typed as `2024`
    /// in a spreadsheet renders as `2024`.
    pub fn render(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Int(i) => i.to_string(),
            RawCell::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 {
                    format!("{:.0}", f)
                } else {
                    f.to_string()
                }
            }
            RawCell::Bool(b) => b.to_string(),
            RawCell::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            RawCell::Error(e) => e.clone(),
        }
    }
}

/// One tabular unit of an uploaded workbook, before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    /// Sheet name as stored in the workbook.
    pub name: String,
    /// Header cells, one per column.
    pub headers: Vec<RawCell>,
    /// Data rows, each padded or truncated to the header width.
    pub rows: Vec<Vec<RawCell>>,
}

impl RawSheet {
    /// Create a raw sheet, normalizing every row to the header width.
    pub fn new(name: impl Into<String>, headers: Vec<RawCell>, rows: Vec<Vec<RawCell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, RawCell::Empty);
                row
            })
            .collect();

        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_normalized_to_header_width() {
        let sheet = RawSheet::new(
            "s",
            vec![RawCell::text("a"), RawCell::text("b")],
            vec![
                vec![RawCell::Int(1)],
                vec![RawCell::Int(1), RawCell::Int(2), RawCell::Int(3)],
            ],
        );
        assert!(sheet.rows.iter().all(|r| r.len() == 2));
        assert_eq!(sheet.rows[0][1], RawCell::Empty);
    }

    #[test]
    fn test_render_integral_float() {
        assert_eq!(RawCell::Float(2024.0).render(), "2024");
        assert_eq!(RawCell::Float(2.5).render(), "2.5");
        assert_eq!(RawCell::Empty.label(), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(RawCell::Empty.is_blank());
        assert!(RawCell::text("   ").is_blank());
        assert!(!RawCell::text("nan").is_blank());
        assert!(!RawCell::Int(0).is_blank());
    }
}
