//! Question answering over a stored upload.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::chart::{render, Chart};
use crate::error::{Result, SheetQueryError};
use crate::schema::CellValue;
use crate::store::{UploadMetadataRecord, UploadStore};
use crate::translate::{translate_or_fallback, TableCatalog, Translator};

/// Result of asking a question.
///
/// Serializes with a `success` flag: `true` with data and chart for an
/// answer, `false` with the execution error for a failed query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The plan's SQL ran.
    Answered {
        data: Vec<IndexMap<String, CellValue>>,
        chart: Chart,
        explanation: String,
        insights: String,
        row_count: usize,
        /// False when the fallback plan was used.
        translated: bool,
    },
    /// The plan's SQL failed against the store.
    Failed {
        error: String,
        fallback_explanation: String,
    },
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Answered { .. })
    }
}

impl Serialize for QueryOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            QueryOutcome::Answered {
                data,
                chart,
                explanation,
                insights,
                row_count,
                translated,
            } => {
                let mut map = serializer.serialize_map(Some(7))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                map.serialize_entry("chart", chart)?;
                map.serialize_entry("explanation", explanation)?;
                map.serialize_entry("insights", insights)?;
                map.serialize_entry("row_count", row_count)?;
                map.serialize_entry("translated", translated)?;
                map.end()
            }
            QueryOutcome::Failed {
                error,
                fallback_explanation,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("fallback_explanation", fallback_explanation)?;
                map.end()
            }
        }
    }
}

/// Metadata of one upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInfo {
    pub table_id: String,
    pub tables: Vec<UploadMetadataRecord>,
}

/// Answer a question about an upload.
///
/// Unknown uploads fail with `NotFound`. Translation problems never fail the
/// call; they switch to the fallback plan. SQL that fails to execute yields
/// [`QueryOutcome::Failed`] rather than an error.
pub fn ask(
    store: &UploadStore,
    translator: Option<&dyn Translator>,
    upload_id: &str,
    question: &str,
    fallback_row_limit: usize,
) -> Result<QueryOutcome> {
    if question.trim().is_empty() {
        return Err(SheetQueryError::Validation(
            "table_id and question are required".to_string(),
        ));
    }

    let records = store.load_metadata(upload_id)?;
    let catalog = TableCatalog::from_records(&records);

    let translation = translate_or_fallback(translator, question, &catalog, fallback_row_limit)?;
    let translated = translation.is_translated();
    let plan = translation.into_plan();

    match store.execute(&plan.sql_query) {
        Ok(result) => {
            info!(
                upload_id,
                rows = result.row_count(),
                translated,
                "answered question"
            );
            Ok(QueryOutcome::Answered {
                data: result.records(result.row_count()),
                chart: render(&result, plan.visualization_type),
                explanation: plan.explanation,
                insights: plan.insights,
                row_count: result.row_count(),
                translated,
            })
        }
        Err(e) => {
            warn!(upload_id, sql = %plan.sql_query, error = %e, "query failed");
            Ok(QueryOutcome::Failed {
                error: e.to_string(),
                fallback_explanation: plan.explanation,
            })
        }
    }
}

/// Metadata records of an upload; `NotFound` for unknown ids.
pub fn table_info(store: &UploadStore, upload_id: &str) -> Result<TableInfo> {
    Ok(TableInfo {
        table_id: upload_id.to_string(),
        tables: store.load_metadata(upload_id)?,
    })
}
