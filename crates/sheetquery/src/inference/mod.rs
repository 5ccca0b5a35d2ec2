//! Schema inference: column naming, kind detection and sheet cleaning.

mod kind;
mod naming;
mod sheet;
mod temporal;

pub use kind::{infer_kind, parse_integer, parse_numeric, parse_temporal};
pub use naming::{
    clean_name, dedupe_names, generate_name, is_placeholder, is_valid_identifier, sanitize,
    table_name_for, MAX_NAME_LEN,
};
pub use sheet::{SchemaInferencer, NULL_SENTINELS};
pub use temporal::parse_datetime;
