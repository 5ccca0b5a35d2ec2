//! Property-based tests for naming, inference and identifier handling.
//!
//! ```bash
//! PROPTEST_CASES=10000 cargo test -p sheetquery --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use sheetquery::inference::{
    clean_name, dedupe_names, infer_kind, is_valid_identifier, parse_datetime, table_name_for,
    MAX_NAME_LEN,
};
use sheetquery::input::RawCell;
use sheetquery::store::quote_identifier;
use sheetquery::DataKind;

/// Header labels as they show up in real sheets.
fn header_label() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_\\-\\.\\s\\(\\)\\$%#]{0,80}",
        "Unnamed: [0-9]{1,3}",
        "\\PC{0,60}",
    ]
}

proptest! {
    #[test]
    fn clean_name_is_always_a_valid_identifier(label in header_label()) {
        let name = clean_name(Some(&label));
        prop_assert!(!name.is_empty());
        prop_assert!(name.len() <= MAX_NAME_LEN);
        prop_assert!(is_valid_identifier(&name), "bad name {:?} from {:?}", name, label);
    }

    #[test]
    fn clean_name_is_deterministic_for_real_labels(label in "[A-Za-z][A-Za-z0-9 _]{0,40}") {
        prop_assert_eq!(clean_name(Some(&label)), clean_name(Some(&label)));
    }

    #[test]
    fn dedupe_names_yields_unique_names(labels in prop::collection::vec(header_label(), 0..20)) {
        let names: Vec<String> = labels.iter().map(|l| clean_name(Some(l))).collect();
        let deduped = dedupe_names(names.clone());

        prop_assert_eq!(deduped.len(), names.len());
        let lowered: HashSet<String> = deduped.iter().map(|n| n.to_ascii_lowercase()).collect();
        prop_assert_eq!(lowered.len(), deduped.len());
        for name in &deduped {
            prop_assert!(name.len() <= MAX_NAME_LEN);
            prop_assert!(is_valid_identifier(name));
        }
    }

    #[test]
    fn repeated_labels_get_numbered(label in "[A-Za-z]{1,60}", copies in 2usize..6) {
        let names = dedupe_names(vec![clean_name(Some(&label)); copies]);
        prop_assert_eq!(&names[0], &clean_name(Some(&label)));
        prop_assert!(names[1].ends_with("_2"));
    }

    #[test]
    fn table_names_are_quotable(id in 0u32.., sheet in "\\PC{0,40}") {
        let upload_id = format!("table_{:08x}", id);
        let table = table_name_for(&upload_id, &sheet);
        prop_assert!(table.starts_with(&upload_id));
        prop_assert!(quote_identifier(&table).is_ok());
    }

    #[test]
    fn integer_columns_infer_integer(
        values in prop::collection::vec(-1_000_000i64..1_000_000, 1..30)
    ) {
        let cells: Vec<RawCell> = values.iter().map(|v| RawCell::text(v.to_string())).collect();
        prop_assert_eq!(infer_kind(&cells), DataKind::Integer);
    }

    #[test]
    fn infer_kind_never_panics(values in prop::collection::vec("\\PC{0,20}", 0..30)) {
        let cells: Vec<RawCell> = values.iter().map(|v| RawCell::text(v.as_str())).collect();
        let first = infer_kind(&cells);
        prop_assert_eq!(first, infer_kind(&cells));
    }

    #[test]
    fn parse_datetime_never_panics(value in "\\PC{0,40}") {
        let _ = parse_datetime(&value);
    }

    #[test]
    fn iso_dates_parse(y in 1900i32..2100, m in 1u32..=12, d in 1u32..=28) {
        let text = format!("{:04}-{:02}-{:02}", y, m, d);
        let parsed = parse_datetime(&text);
        prop_assert!(parsed.is_some());
        prop_assert_eq!(parsed.unwrap().format("%Y-%m-%d").to_string(), text);
    }

    #[test]
    fn quote_identifier_rejects_quotes(name in "[A-Za-z]{1,10}\"[A-Za-z ;]{0,10}") {
        prop_assert!(quote_identifier(&name).is_err());
    }
}
