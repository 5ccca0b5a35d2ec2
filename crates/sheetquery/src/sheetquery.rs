//! Main SheetQuery struct and public API.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::SheetQueryConfig;
use crate::error::{Result, SheetQueryError};
use crate::inference::SchemaInferencer;
use crate::input::{content_hash, validate_upload_filename, WorkbookReader};
use crate::query::{self, QueryOutcome, TableInfo};
use crate::store::{new_upload_id, RelationalStore, SqliteStore, UploadStore, UploadSummary};
use crate::translate::Translator;

/// Spreadsheet ingestion and question answering over one relational store.
pub struct SheetQuery {
    config: SheetQueryConfig,
    inferencer: SchemaInferencer,
    store: UploadStore,
    translator: Option<Arc<dyn Translator>>,
}

impl SheetQuery {
    /// Open the SQLite store described by `config`.
    pub fn new(config: SheetQueryConfig) -> Result<Self> {
        let backend = SqliteStore::from_config(&config.store)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Use an already opened relational store. `config.store` is ignored.
    pub fn with_backend(config: SheetQueryConfig, backend: Arc<dyn RelationalStore>) -> Self {
        let reader = WorkbookReader {
            max_rows: config.max_rows,
        };

        Self {
            config,
            inferencer: SchemaInferencer::with_reader(reader),
            store: UploadStore::new(backend),
            translator: None,
        }
    }

    /// Add a translator for natural-language questions.
    ///
    /// Without one, every question is answered by the fallback plan.
    pub fn with_translator(self, translator: impl Translator + 'static) -> Self {
        self.with_shared_translator(Arc::new(translator))
    }

    /// Add a translator that is already shared.
    pub fn with_shared_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Name of the configured translator, if any.
    pub fn translator_name(&self) -> Option<&str> {
        self.translator.as_deref().map(|t| t.name())
    }

    pub fn config(&self) -> &SheetQueryConfig {
        &self.config
    }

    /// The upload store.
    pub fn store(&self) -> &UploadStore {
        &self.store
    }

    /// Ingest a workbook file from disk.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> Result<UploadSummary> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SheetQueryError::Validation(format!("Not a file path: {}", path.display()))
            })?;
        validate_upload_filename(&filename)?;

        let bytes = fs::read(path).map_err(|e| SheetQueryError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.ingest_bytes(&bytes, &filename)
    }

    /// Ingest an uploaded workbook.
    ///
    /// The filename must end in `.xlsx` or `.xls`. Every sheet is cleaned
    /// and stored under a fresh upload id.
    pub fn ingest_bytes(&self, bytes: &[u8], filename: &str) -> Result<UploadSummary> {
        validate_upload_filename(filename)?;

        let sheets = self.inferencer.process_workbook(bytes, filename)?;
        let upload_id = new_upload_id();
        info!(upload_id = %upload_id, filename, sheets = sheets.len(), "ingesting workbook");

        let mut summary = self.store.persist(&upload_id, filename, &sheets)?;
        summary.content_hash = Some(content_hash(bytes));
        Ok(summary)
    }

    /// Answer a question about an upload.
    pub fn ask(&self, upload_id: &str, question: &str) -> Result<QueryOutcome> {
        query::ask(
            &self.store,
            self.translator.as_deref(),
            upload_id,
            question,
            self.config.fallback_row_limit,
        )
    }

    /// Metadata of an upload.
    pub fn table_info(&self, upload_id: &str) -> Result<TableInfo> {
        query::table_info(&self.store, upload_id)
    }
}
