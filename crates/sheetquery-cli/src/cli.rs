//! CLI argument definitions using clap.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sheetquery::{
    MockProvider, OllamaProvider, OpenAIProvider, SheetQueryError, Translator, TranslatorConfig,
};

/// SheetQuery: ask questions of spreadsheet data in plain language
#[derive(Parser)]
#[command(name = "sheetquery")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database holding ingested uploads
    #[arg(long, global = true, default_value = "sheetquery.db")]
    pub database: PathBuf,

    /// Translator used to turn questions into SQL
    #[arg(long, global = true, default_value = "none")]
    pub llm: TranslatorChoice,

    /// Model to use (provider-specific, e.g., "gpt-4", "llama3.2")
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest an Excel workbook (.xlsx or .xls)
    Ingest {
        /// Path to the workbook
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Ask a question about an ingested upload
    Ask {
        /// Upload id printed by `ingest` (e.g. table_1a2b3c4d)
        #[arg(value_name = "UPLOAD_ID")]
        upload_id: String,

        /// The question, in plain language
        #[arg(value_name = "QUESTION")]
        question: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the tables stored for an upload
    Info {
        /// Upload id
        #[arg(value_name = "UPLOAD_ID")]
        upload_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the HTTP API
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table, csv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Translator choice
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TranslatorChoice {
    /// No translator - keyword fallback only
    #[default]
    None,
    /// OpenAI GPT API (requires OPENAI_API_KEY)
    OpenAI,
    /// Ollama local models (requires Ollama running)
    Ollama,
    /// Mock provider for testing
    Mock,
}

impl TranslatorChoice {
    /// Build the chosen translator, overriding the model if given.
    pub fn build(
        &self,
        model: Option<String>,
    ) -> Result<Option<Arc<dyn Translator>>, SheetQueryError> {
        let with_model = |mut config: TranslatorConfig| {
            if let Some(m) = model.clone() {
                config.model = m;
            }
            config
        };

        let translator: Arc<dyn Translator> = match self {
            TranslatorChoice::None => return Ok(None),
            TranslatorChoice::OpenAI => Arc::new(OpenAIProvider::from_env_with_config(
                with_model(TranslatorConfig::default()),
            )?),
            TranslatorChoice::Ollama => Arc::new(OllamaProvider::from_env_with_config(
                with_model(OllamaProvider::default_config()),
            )?),
            TranslatorChoice::Mock => Arc::new(MockProvider::new()),
        };
        Ok(Some(translator))
    }
}

impl std::str::FromStr for TranslatorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(TranslatorChoice::None),
            "openai" | "gpt" => Ok(TranslatorChoice::OpenAI),
            "ollama" | "local" => Ok(TranslatorChoice::Ollama),
            "mock" | "test" => Ok(TranslatorChoice::Mock),
            _ => Err(format!(
                "Unknown provider: {}. Use: none, openai, ollama, or mock.",
                s
            )),
        }
    }
}

impl std::fmt::Display for TranslatorChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslatorChoice::None => write!(f, "none"),
            TranslatorChoice::OpenAI => write!(f, "openai"),
            TranslatorChoice::Ollama => write!(f, "ollama"),
            TranslatorChoice::Mock => write!(f, "mock"),
        }
    }
}
