//! Upload metadata handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use sheetquery::TableInfo;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// GET /tables/:table_id/info - Metadata of every table in an upload.
pub async fn get_table_info(
    State(state): State<AppState>,
    Path(table_id): Path<String>,
) -> Result<Json<TableInfo>, ApiError> {
    let info = state
        .run_blocking(move |sq| sq.table_info(&table_id))
        .await?;
    Ok(Json(info))
}
