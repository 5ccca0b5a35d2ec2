//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sheetquery::SheetQueryError;
use tracing::error;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client.
    BadRequest(String),
    /// Internal server error.
    Internal(String),
    /// Error from the sheetquery library.
    SheetQuery(SheetQueryError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            ApiError::SheetQuery(e) => match e {
                SheetQueryError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                SheetQueryError::Ingestion { .. } => (StatusCode::BAD_REQUEST, "ingestion_error"),
                SheetQueryError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                SheetQueryError::Storage { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
                }
                SheetQueryError::Translation(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "translation_error")
                }
                SheetQueryError::QueryExecution(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "query_error")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.parts();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
            ApiError::SheetQuery(e) => e.to_string(),
        };

        if status.is_server_error() {
            error!(kind, message = %message, "request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: kind.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<SheetQueryError> for ApiError {
    fn from(err: SheetQueryError) -> Self {
        ApiError::SheetQuery(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::SheetQuery(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {}
