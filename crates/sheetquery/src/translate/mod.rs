//! Natural-language question translation.
//!
//! A [`Translator`] turns a question plus the upload's table catalog into a
//! [`QueryPlan`]: SQL, a suggested chart kind, and short explanatory text.
//! Translation is optional - without a translator, or when it fails,
//! [`translate_or_fallback`] produces a generic plan over the first table.
//!
//! # Supported Providers
//!
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Ollama** - Local models, no API key needed (honours `OLLAMA_HOST`)
//! - **Mock** - Deterministic plans for tests
//!
//! # Example
//!
//! ```no_run
//! use sheetquery::{OpenAIProvider, SheetQuery, SheetQueryConfig};
//!
//! let sq = SheetQuery::new(SheetQueryConfig::default())
//!     .unwrap()
//!     .with_translator(OpenAIProvider::from_env().unwrap());
//! ```

mod fallback;
mod mock;
mod ollama;
mod openai;
mod prompts;
mod provider;

pub use fallback::{fallback_plan, translate_or_fallback, Translation, DEFAULT_FALLBACK_ROW_LIMIT};
pub use mock::MockProvider;
pub use ollama::{OllamaProvider, DEFAULT_OLLAMA_MODEL};
pub use openai::OpenAIProvider;
pub use prompts::{query_prompt, system_prompt};
pub use provider::{
    strip_code_fence, QueryPlan, TableCatalog, TableDescription, Translator, TranslatorConfig,
    VisualizationType,
};
