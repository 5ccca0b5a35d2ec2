//! Permissive date and timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Timestamp layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, tried in order. US month-first wins over day-first
/// when both would parse.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Parse a calendar date or timestamp from text.
///
/// Dates without a time component land at midnight. Offsets in RFC 3339
/// input are dropped after conversion to the local wall-clock reading.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    // Every accepted layout starts with a digit or a month name.
    if trimmed.len() < 6 || !trimmed.chars().next()?.is_ascii_alphanumeric() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_iso_date() {
        let dt = parse_datetime("2024-01-15").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_iso_timestamp_variants() {
        assert!(parse_datetime("2024-01-15T08:30:00").is_some());
        assert!(parse_datetime("2024-01-15 08:30:00.250").is_some());
        assert!(parse_datetime("2024-01-15T08:30:00Z").is_some());
        assert!(parse_datetime("2024-01-15 08:30").is_some());
    }

    #[test]
    fn test_regional_and_month_name_forms() {
        assert!(parse_datetime("12/25/2024").is_some());
        assert!(parse_datetime("25/12/2024").is_some());
        assert!(parse_datetime("25.12.2024").is_some());
        assert!(parse_datetime("Jan 5, 2024").is_some());
        assert!(parse_datetime("5 January 2024").is_some());
    }

    #[test]
    fn test_rejects_non_dates() {
        assert!(parse_datetime("").is_none());
        assert!(parse_datetime("hello world").is_none());
        assert!(parse_datetime("2024").is_none());
        assert!(parse_datetime("2024-13-45").is_none());
        assert!(parse_datetime("12.5").is_none());
    }
}
