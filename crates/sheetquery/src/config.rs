//! Configuration for a SheetQuery instance.

use std::path::PathBuf;

use crate::translate::DEFAULT_FALLBACK_ROW_LIMIT;

/// Default database file.
pub const DEFAULT_DATABASE_PATH: &str = "sheetquery.db";

/// Where the relational store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Database file on disk, created if missing.
    File(PathBuf),
    /// Private in-memory database, gone when the store is dropped.
    InMemory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File(PathBuf::from(DEFAULT_DATABASE_PATH))
    }
}

/// Configuration for SheetQuery.
#[derive(Debug, Clone)]
pub struct SheetQueryConfig {
    /// Relational store location.
    pub store: StoreConfig,
    /// Row limit of the fallback query used when translation is unavailable.
    pub fallback_row_limit: usize,
    /// Maximum data rows read per sheet (None = all).
    pub max_rows: Option<usize>,
}

impl Default for SheetQueryConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            fallback_row_limit: DEFAULT_FALLBACK_ROW_LIMIT,
            max_rows: None,
        }
    }
}

impl SheetQueryConfig {
    /// Configuration backed by a database file.
    pub fn with_database(path: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreConfig::File(path.into()),
            ..Self::default()
        }
    }

    /// Configuration backed by a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            store: StoreConfig::InMemory,
            ..Self::default()
        }
    }
}
