//! Prompt templates for question translation.

use crate::error::Result;

use super::provider::{TableCatalog, VisualizationType};

/// System prompt shared by all providers.
pub fn system_prompt() -> String {
    let kinds: Vec<&str> = VisualizationType::ALL.iter().map(|v| v.as_str()).collect();

    format!(
        r#"You are an expert data analyst that helps users analyze their spreadsheet data through natural language questions.

Given a user's question about their data, you need to:
1. Understand what they are asking for
2. Write a SQLite query that answers the question
3. Suggest the best visualization type
4. Describe what to look for in the results

Available visualization types: {}

Always respond in JSON format with:
{{
    "sql_query": "SELECT statement",
    "visualization_type": "chart type",
    "explanation": "what this query does",
    "insights": "key insights to look for"
}}"#,
        kinds.join(", ")
    )
}

/// Build the user prompt for one question.
pub fn query_prompt(question: &str, catalog: &TableCatalog) -> Result<String> {
    Ok(format!(
        r#"Available tables and columns:
{}

Use only the tables and columns listed above. Quote identifiers with double quotes.

User question: "{}""#,
        catalog.to_prompt_json()?,
        question.trim()
    ))
}
