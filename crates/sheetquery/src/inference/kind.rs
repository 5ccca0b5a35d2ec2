//! Column kind inference.

use chrono::NaiveDateTime;

use crate::input::RawCell;
use crate::schema::DataKind;

use super::temporal::parse_datetime;

/// Numeric view of a cell, shared by every value of a column.
///
/// Booleans count as 0/1. Text must parse as a finite number after trimming.
pub fn parse_numeric(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Int(i) => Some(*i as f64),
        RawCell::Float(f) if f.is_finite() => Some(*f),
        RawCell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        RawCell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Integer view of a cell whose numeric value has no fractional part.
pub fn parse_integer(cell: &RawCell) -> Option<i64> {
    match cell {
        RawCell::Int(i) => Some(*i),
        RawCell::Text(s) => match s.trim().parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => parse_numeric(cell).filter(|v| fits_i64(*v)).map(|v| v as i64),
        },
        other => parse_numeric(other).filter(|v| fits_i64(*v)).map(|v| v as i64),
    }
}

/// Date view of a cell.
pub fn parse_temporal(cell: &RawCell) -> Option<NaiveDateTime> {
    match cell {
        RawCell::DateTime(dt) => Some(*dt),
        RawCell::Text(s) => parse_datetime(s),
        _ => None,
    }
}

fn fits_i64(v: f64) -> bool {
    v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64
}

fn is_null(cell: &RawCell) -> bool {
    matches!(cell, RawCell::Empty | RawCell::Error(_))
}

/// Infer the kind of a column from its values.
///
/// Nulls are skipped. First match wins:
/// 1. every value numeric: INTEGER if none has a fractional part, else REAL;
/// 2. every value a date or timestamp: DATETIME;
/// 3. TEXT.
///
/// A single value failing a rule disqualifies that rule for the whole
/// column. Numbers take precedence over dates, so `"2024"` is INTEGER.
pub fn infer_kind<'a>(values: impl IntoIterator<Item = &'a RawCell>) -> DataKind {
    let values: Vec<&RawCell> = values.into_iter().filter(|c| !is_null(c)).collect();
    if values.is_empty() {
        return DataKind::Text;
    }

    if values.iter().all(|c| parse_numeric(c).is_some()) {
        return if values.iter().all(|c| parse_integer(c).is_some()) {
            DataKind::Integer
        } else {
            DataKind::Real
        };
    }

    if values.iter().all(|c| parse_temporal(c).is_some()) {
        return DataKind::DateTime;
    }

    DataKind::Text
}
