//! Translation with a keyword-driven fallback plan.

use tracing::{info, warn};

use crate::error::{Result, SheetQueryError};
use crate::store::quote_identifier;

use super::provider::{QueryPlan, TableCatalog, Translator, VisualizationType};

/// Default row limit of the fallback query.
pub const DEFAULT_FALLBACK_ROW_LIMIT: usize = 100;

/// Which path produced the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    /// The translator answered with a valid plan.
    Translated(QueryPlan),
    /// No translator, or it failed; `reason` says why.
    Fallback { reason: String, plan: QueryPlan },
}

impl Translation {
    /// The plan to execute.
    pub fn plan(&self) -> &QueryPlan {
        match self {
            Translation::Translated(plan) | Translation::Fallback { plan, .. } => plan,
        }
    }

    /// Take the plan.
    pub fn into_plan(self) -> QueryPlan {
        match self {
            Translation::Translated(plan) | Translation::Fallback { plan, .. } => plan,
        }
    }

    /// Returns true if the translator's own plan is used.
    pub fn is_translated(&self) -> bool {
        matches!(self, Translation::Translated(_))
    }
}

/// Translate `question`, falling back to a generic plan over the first
/// table when no translator is configured, it errors, or its plan is
/// invalid.
///
/// Errors only if the catalog is empty.
pub fn translate_or_fallback(
    translator: Option<&dyn Translator>,
    question: &str,
    catalog: &TableCatalog,
    row_limit: usize,
) -> Result<Translation> {
    let first_table = catalog
        .first_table()
        .ok_or_else(|| SheetQueryError::Validation("Upload has no queryable tables".to_string()))?;

    let reason = match translator {
        None => "no translator configured".to_string(),
        Some(translator) => match translator
            .translate(question, catalog)
            .and_then(|plan| plan.validate().map(|_| plan))
        {
            Ok(plan) => {
                info!(
                    translator = translator.name(),
                    visualization = %plan.visualization_type,
                    "translated question"
                );
                return Ok(Translation::Translated(plan));
            }
            Err(e) => e.to_string(),
        },
    };

    warn!(reason = %reason, table = first_table, "using fallback query plan");
    Ok(Translation::Fallback {
        plan: fallback_plan(question, first_table, row_limit)?,
        reason,
    })
}

/// Generic plan selecting the first `row_limit` rows of `table`.
///
/// The chart kind is picked from keywords in the lower-cased question:
/// `trend`/`time` give a line chart, `sum`/`total`/`count` a bar chart,
/// anything else a table.
pub fn fallback_plan(question: &str, table: &str, row_limit: usize) -> Result<QueryPlan> {
    let sql = format!("SELECT * FROM {} LIMIT {}", quote_identifier(table)?, row_limit);
    let question = question.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| question.contains(w));

    let plan = if mentions(&["trend", "time"]) {
        QueryPlan::new(
            sql,
            VisualizationType::Line,
            "Showing data trends over time",
            "Look for patterns and changes in the data",
        )
    } else if mentions(&["sum", "total", "count"]) {
        QueryPlan::new(
            sql,
            VisualizationType::Bar,
            "Showing aggregated data",
            "Compare totals across categories",
        )
    } else {
        QueryPlan::new(
            sql,
            VisualizationType::Table,
            "Showing raw data overview",
            "Examine the data structure and values",
        )
    };
    Ok(plan)
}
