//! Workbook upload handler.

use axum::{
    extract::{Multipart, State},
    Json,
};
use sheetquery::UploadSummary;
use tracing::info;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Multipart field carrying the workbook.
pub const UPLOAD_FIELD: &str = "file";

/// POST /upload - Ingest a workbook sent as multipart field `file`.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadSummary>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = upload.ok_or_else(|| {
        ApiError::BadRequest(format!("Missing multipart field '{}'", UPLOAD_FIELD))
    })?;
    info!(filename = %filename, bytes = bytes.len(), "received upload");

    let summary = state
        .run_blocking(move |sq| sq.ingest_bytes(&bytes, &filename))
        .await?;
    Ok(Json(summary))
}
