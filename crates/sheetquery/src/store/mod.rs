//! Relational persistence of uploads.
//!
//! Each sheet of an upload becomes one table named
//! `{upload_id}_{normalized sheet name}`; each upload also gets an
//! append-only `{upload_id}_metadata` table describing those tables.

mod backend;
mod sqlite;
mod upload;

pub use backend::{quote_identifier, RelationalStore, ResultSet};
pub use sqlite::SqliteStore;
pub use upload::{
    metadata_table_for, new_upload_id, SheetSummary, UploadMetadataRecord, UploadStore,
    UploadSummary, METADATA_SUFFIX, UPLOAD_ID_PREFIX,
};
