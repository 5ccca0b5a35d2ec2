//! Liveness handler.

use axum::Json;
use serde::Serialize;

/// Service status.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// GET / - Report that the API is running.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "SheetQuery API",
        status: "running",
    })
}
