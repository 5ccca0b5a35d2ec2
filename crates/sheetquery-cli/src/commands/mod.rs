//! CLI command implementations.

pub mod ask;
pub mod info;
pub mod ingest;
pub mod serve;

use std::path::PathBuf;

use sheetquery::{SheetQuery, SheetQueryConfig};

use crate::cli::TranslatorChoice;

/// Global options shared by every command.
pub struct Session {
    pub database: PathBuf,
    pub llm: TranslatorChoice,
    pub model: Option<String>,
    pub verbose: bool,
}

impl Session {
    /// Open the database and attach the chosen translator.
    pub fn open(&self) -> Result<SheetQuery, Box<dyn std::error::Error>> {
        let mut sq = SheetQuery::new(SheetQueryConfig::with_database(&self.database))?;
        if let Some(translator) = self.llm.build(self.model.clone())? {
            sq = sq.with_shared_translator(translator);
        }
        Ok(sq)
    }
}
