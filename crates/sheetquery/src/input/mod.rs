//! Input handling: reading uploaded workbooks into raw sheets.

mod source;
mod workbook;

pub use source::{RawCell, RawSheet};
pub use workbook::{content_hash, validate_upload_filename, WorkbookReader, ACCEPTED_EXTENSIONS};
