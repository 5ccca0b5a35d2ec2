//! Schema types for representing inferred sheet structure.

mod column;
mod table;
mod types;

pub use column::CleanedColumn;
pub use table::CleanedSheet;
pub use types::{CellValue, DataKind, DATETIME_FORMAT};
