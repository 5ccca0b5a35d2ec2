//! Error types for the SheetQuery library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SheetQuery operations.
#[derive(Debug, Error)]
pub enum SheetQueryError {
    /// Bad input shape, extension, or missing field.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The uploaded file could not be read as a spreadsheet.
    #[error("Error processing Excel file '{filename}': {message}")]
    Ingestion { filename: String, message: String },

    /// A read or write against the relational store failed.
    #[error("Storage error for table '{table}': {message}")]
    Storage { table: String, message: String },

    /// No metadata relation exists for the upload identifier.
    #[error("Upload not found: {upload_id}")]
    NotFound { upload_id: String },

    /// The natural-language translator failed or returned unusable output.
    #[error("Translation error: {0}")]
    Translation(String),

    /// Translated or fallback SQL failed against the store.
    #[error("SQL execution error: {0}")]
    QueryExecution(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SheetQueryError {
    /// Build a storage error tagged with the offending table.
    pub fn storage(table: impl Into<String>, err: impl std::fmt::Display) -> Self {
        SheetQueryError::Storage {
            table: table.into(),
            message: err.to_string(),
        }
    }

    /// Build an ingestion error for the given file.
    pub fn ingestion(filename: impl Into<String>, err: impl std::fmt::Display) -> Self {
        SheetQueryError::Ingestion {
            filename: filename.into(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for SheetQuery operations.
pub type Result<T> = std::result::Result<T, SheetQueryError>;
