//! Mock translator for testing.

use crate::error::{Result, SheetQueryError};

use super::provider::{QueryPlan, TableCatalog, Translator, TranslatorConfig, VisualizationType};

#[derive(Debug, Clone)]
enum Behavior {
    /// Build a plan from the catalog.
    Catalog,
    /// Parse a canned model reply.
    Reply(String),
    /// Always fail.
    Fail(String),
}

/// Mock translator that returns predictable plans for testing.
pub struct MockProvider {
    config: TranslatorConfig,
    behavior: Behavior,
}

impl MockProvider {
    /// Create a mock that answers from the catalog.
    ///
    /// Questions containing "how many" become a row count of the first
    /// table; anything else selects its first ten rows.
    pub fn new() -> Self {
        Self {
            config: TranslatorConfig {
                model: "mock".to_string(),
                ..TranslatorConfig::default()
            },
            behavior: Behavior::Catalog,
        }
    }

    /// Create a mock that parses `reply` as if a model had sent it.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Reply(reply.into()),
            ..Self::new()
        }
    }

    /// Create a mock whose every translation fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Fail(message.into()),
            ..Self::new()
        }
    }

    /// Create with custom configuration.
    pub fn with_config(config: TranslatorConfig) -> Self {
        Self {
            config,
            behavior: Behavior::Catalog,
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for MockProvider {
    fn translate(&self, question: &str, catalog: &TableCatalog) -> Result<QueryPlan> {
        match &self.behavior {
            Behavior::Reply(reply) => QueryPlan::from_reply(reply),
            Behavior::Fail(message) => Err(SheetQueryError::Translation(message.clone())),
            Behavior::Catalog => {
                let table = catalog.first_table().ok_or_else(|| {
                    SheetQueryError::Translation("No tables to query".to_string())
                })?;

                if question.to_lowercase().contains("how many") {
                    Ok(QueryPlan::new(
                        format!("SELECT COUNT(*) AS row_count FROM \"{}\"", table),
                        VisualizationType::Table,
                        format!("Counting rows in {}", table),
                        "Compare the count with the number of rows you expected",
                    ))
                } else {
                    Ok(QueryPlan::new(
                        format!("SELECT * FROM \"{}\" LIMIT 10", table),
                        VisualizationType::Table,
                        format!("Showing the first rows of {}", table),
                        "Check the column values look as expected",
                    ))
                }
            }
        }
    }

    fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::TableDescription;
    use indexmap::IndexMap;

    fn catalog() -> TableCatalog {
        let mut catalog = TableCatalog::default();
        catalog.insert(
            "table_00000000_Sheet1",
            TableDescription {
                columns: vec!["a".to_string()],
                dtypes: IndexMap::new(),
                row_count: 1,
            },
        );
        catalog
    }

    #[test]
    fn test_catalog_plans() {
        let mock = MockProvider::new();
        let plan = mock.translate("How many rows?", &catalog()).unwrap();
        assert_eq!(
            plan.sql_query,
            "SELECT COUNT(*) AS row_count FROM \"table_00000000_Sheet1\""
        );

        let plan = mock.translate("show me", &catalog()).unwrap();
        assert!(plan.sql_query.ends_with("LIMIT 10"));
        assert_eq!(plan.visualization_type, VisualizationType::Table);
    }

    #[test]
    fn test_empty_catalog_fails() {
        assert!(MockProvider::new()
            .translate("anything", &TableCatalog::default())
            .is_err());
    }

    #[test]
    fn test_reply_and_failure() {
        let mock =
            MockProvider::with_reply(r#"{"sql_query":"SELECT 2","visualization_type":"pie"}"#);
        assert_eq!(
            mock.translate("q", &catalog()).unwrap().visualization_type,
            VisualizationType::Pie
        );

        let err = MockProvider::failing("boom")
            .translate("q", &catalog())
            .unwrap_err();
        assert!(matches!(err, SheetQueryError::Translation(m) if m == "boom"));
    }
}
