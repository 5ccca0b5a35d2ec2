//! Translator trait and types.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetQueryError};
use crate::schema::DataKind;
use crate::store::UploadMetadataRecord;

/// Chart kinds a plan may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationType {
    Bar,
    Line,
    Pie,
    Scatter,
    Table,
    Heatmap,
}

impl VisualizationType {
    /// All supported kinds, in prompt order.
    pub const ALL: [VisualizationType; 6] = [
        VisualizationType::Bar,
        VisualizationType::Line,
        VisualizationType::Pie,
        VisualizationType::Scatter,
        VisualizationType::Table,
        VisualizationType::Heatmap,
    ];

    /// Lowercase name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationType::Bar => "bar",
            VisualizationType::Line => "line",
            VisualizationType::Pie => "pie",
            VisualizationType::Scatter => "scatter",
            VisualizationType::Table => "table",
            VisualizationType::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualizationType {
    type Err = SheetQueryError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        VisualizationType::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| {
                SheetQueryError::Translation(format!("Unknown visualization type '{}'", s.trim()))
            })
    }
}

/// What the translator produced for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    /// SQL to run against the store.
    pub sql_query: String,

    /// Suggested chart kind.
    pub visualization_type: VisualizationType,

    /// What the query does.
    pub explanation: String,

    /// What to look for in the result.
    pub insights: String,
}

impl QueryPlan {
    /// Create a plan.
    pub fn new(
        sql_query: impl Into<String>,
        visualization_type: VisualizationType,
        explanation: impl Into<String>,
        insights: impl Into<String>,
    ) -> Self {
        Self {
            sql_query: sql_query.into(),
            visualization_type,
            explanation: explanation.into(),
            insights: insights.into(),
        }
    }

    /// Reject plans without SQL.
    pub fn validate(&self) -> Result<()> {
        if self.sql_query.trim().is_empty() {
            return Err(SheetQueryError::Translation(
                "Translator returned an empty sql_query".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a model reply into a plan.
    ///
    /// Tolerates a surrounding markdown code fence. The reply must carry a
    /// non-empty `sql_query` and a known `visualization_type`; explanation
    /// and insights default to empty.
    pub fn from_reply(reply: &str) -> Result<Self> {
        let raw: RawPlan = serde_json::from_str(strip_code_fence(reply)).map_err(|e| {
            SheetQueryError::Translation(format!("Failed to parse translator JSON reply: {}", e))
        })?;

        let visualization_type = raw
            .visualization_type
            .as_deref()
            .ok_or_else(|| {
                SheetQueryError::Translation("Reply is missing visualization_type".to_string())
            })?
            .parse()?;

        let plan = QueryPlan {
            sql_query: raw.sql_query.unwrap_or_default().trim().to_string(),
            visualization_type,
            explanation: raw.explanation.unwrap_or_default(),
            insights: raw.insights.unwrap_or_default(),
        };
        plan.validate()?;
        Ok(plan)
    }
}

/// Reply shape before validation.
#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    sql_query: Option<String>,
    #[serde(default)]
    visualization_type: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    insights: Option<String>,
}

/// Extract the JSON body from a reply that may be wrapped in a code fence.
pub fn strip_code_fence(response: &str) -> &str {
    if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(response)
    } else {
        response.trim()
    }
}

/// One queryable table as described to the translator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDescription {
    pub columns: Vec<String>,
    pub dtypes: IndexMap<String, DataKind>,
    pub row_count: usize,
}

/// Tables of one upload, keyed by relation name in metadata order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TableCatalog {
    tables: IndexMap<String, TableDescription>,
}

impl TableCatalog {
    /// Build a catalog from metadata records. Later records for the same
    /// relation replace earlier ones but keep the first position.
    pub fn from_records(records: &[UploadMetadataRecord]) -> Self {
        let tables = records
            .iter()
            .map(|r| {
                (
                    r.table_name.clone(),
                    TableDescription {
                        columns: r.columns.clone(),
                        dtypes: r.dtypes.clone(),
                        row_count: r.row_count,
                    },
                )
            })
            .collect();
        Self { tables }
    }

    /// Add or replace one table.
    pub fn insert(&mut self, name: impl Into<String>, description: TableDescription) {
        self.tables.insert(name.into(), description);
    }

    /// First table in metadata order.
    pub fn first_table(&self) -> Option<&str> {
        self.tables.keys().next().map(String::as_str)
    }

    /// Look up a table.
    pub fn get(&self, name: &str) -> Option<&TableDescription> {
        self.tables.get(name)
    }

    /// Iterate over tables in order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TableDescription)> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Pretty JSON rendering used in prompts.
    pub fn to_prompt_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Configuration for translator providers.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Model to use (e.g., "gpt-4").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            max_tokens: 1024,
            temperature: 0.1,
        }
    }
}

/// Turns a natural-language question into a query plan.
///
/// Implementations must be thread-safe (Send + Sync) to allow sharing
/// across requests.
pub trait Translator: Send + Sync {
    /// Translate a question over the given tables.
    ///
    /// # Arguments
    /// * `question` - The user's question
    /// * `catalog` - Tables, columns and kinds of the upload
    ///
    /// # Returns
    /// A validated plan, or a `Translation` error
    fn translate(&self, question: &str, catalog: &TableCatalog) -> Result<QueryPlan>;

    /// Get the configuration for this provider.
    fn config(&self) -> &TranslatorConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}
