//! Application state for the web server.

use std::sync::Arc;

use sheetquery::SheetQuery;

use super::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Ingestion and query engine; internally synchronized.
    pub sheetquery: Arc<SheetQuery>,
    /// Name of the configured translator (for display).
    pub translator_name: Option<String>,
}

impl AppState {
    /// Create new application state.
    pub fn new(sheetquery: Arc<SheetQuery>) -> Self {
        let translator_name = sheetquery.translator_name().map(str::to_string);
        Self {
            sheetquery,
            translator_name,
        }
    }

    /// Run blocking library work (workbook parsing, SQLite, translator
    /// HTTP calls) off the async runtime.
    pub async fn run_blocking<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&SheetQuery) -> sheetquery::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sq = Arc::clone(&self.sheetquery);
        tokio::task::spawn_blocking(move || work(&sq))
            .await
            .map_err(|e| ApiError::Internal(format!("worker task failed: {}", e)))?
            .map_err(ApiError::from)
    }
}
