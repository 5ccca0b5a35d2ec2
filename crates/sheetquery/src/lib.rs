//! SheetQuery: ask questions of spreadsheet data in plain language.
//!
//! SheetQuery ingests Excel workbooks into a relational store and answers
//! natural-language questions about them with SQL, a suggested chart and a
//! short explanation.
//!
//! # Pipeline
//!
//! - **Ingest**: each sheet is cleaned (column names sanitized, blank rows
//!   dropped, null sentinels removed), every column gets an inferred kind,
//!   and the sheet is stored as its own table under a fresh upload id
//! - **Ask**: the upload's metadata becomes a table catalog, a translator
//!   (or the keyword fallback) turns the question into SQL, and the result
//!   is rendered as plotly-compatible chart JSON
//!
//! # Example
//!
//! ```no_run
//! use sheetquery::{SheetQuery, SheetQueryConfig};
//!
//! let sq = SheetQuery::new(SheetQueryConfig::with_database("data.db")).unwrap();
//! let upload = sq.ingest_file("sales.xlsx").unwrap();
//!
//! let outcome = sq.ask(&upload.upload_id, "total sales by region").unwrap();
//! println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
//! ```

pub mod chart;
pub mod config;
pub mod error;
pub mod inference;
pub mod input;
pub mod query;
pub mod schema;
pub mod store;
pub mod translate;

mod sheetquery;

pub use crate::sheetquery::SheetQuery;
pub use chart::Chart;
pub use config::{SheetQueryConfig, StoreConfig};
pub use error::{Result, SheetQueryError};
pub use query::{QueryOutcome, TableInfo};
pub use schema::{CellValue, CleanedColumn, CleanedSheet, DataKind};
pub use store::{RelationalStore, ResultSet, SqliteStore, UploadMetadataRecord, UploadSummary};
pub use translate::{
    MockProvider, OllamaProvider, OpenAIProvider, QueryPlan, Translation, Translator,
    TranslatorConfig, VisualizationType,
};
