//! Question handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use sheetquery::QueryOutcome;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request to ask a question about an upload.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Upload id returned by /upload.
    #[serde(default)]
    pub table_id: Option<String>,

    /// The question to ask.
    #[serde(default)]
    pub question: Option<String>,
}

/// POST /query - Answer a question.
///
/// SQL that fails to run is reported in the body with `success: false`,
/// not as an error status.
pub async fn process_query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryOutcome>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (table_id, question) = match (request.table_id, request.question) {
        (Some(table_id), Some(question))
            if !table_id.trim().is_empty() && !question.trim().is_empty() =>
        {
            (table_id, question)
        }
        _ => {
            return Err(ApiError::BadRequest(
                "table_id and question are required".to_string(),
            ))
        }
    };

    let outcome = state
        .run_blocking(move |sq| sq.ask(table_id.trim(), &question))
        .await?;
    Ok(Json(outcome))
}
