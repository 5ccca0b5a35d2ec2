//! Question answering over ingested workbooks.

mod common;

use std::sync::Arc;

use common::{sales_sheet, unnamed_sheet, xlsx};
use serde_json::json;
use sheetquery::{
    CellValue, Chart, MockProvider, QueryOutcome, RelationalStore, SheetQuery, SheetQueryConfig,
    SheetQueryError, SqliteStore, VisualizationType,
};

/// Ingest the sales workbook; returns the engine and the upload id.
fn ingested(sq: SheetQuery) -> (SheetQuery, String) {
    let summary = sq
        .ingest_bytes(&xlsx(&[sales_sheet(), unnamed_sheet()]), "sales.xlsx")
        .unwrap();
    (sq, summary.upload_id)
}

fn in_memory() -> SheetQuery {
    SheetQuery::new(SheetQueryConfig::in_memory()).unwrap()
}

#[test]
fn test_fallback_without_translator() {
    let (sq, upload_id) = ingested(in_memory());
    assert!(sq.translator_name().is_none());

    let outcome = sq.ask(&upload_id, "Show the sales trend").unwrap();
    match outcome {
        QueryOutcome::Answered {
            data,
            chart,
            explanation,
            row_count,
            translated,
            ..
        } => {
            assert!(!translated);
            assert_eq!(row_count, 10);
            assert_eq!(data.len(), 10);
            assert_eq!(explanation, "Showing data trends over time");
            assert_eq!(chart.chart_type(), VisualizationType::Line);
            assert_eq!(data[0]["Region"], CellValue::Text("North".into()));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_fallback_row_limit() {
    let config = SheetQueryConfig {
        fallback_row_limit: 4,
        ..SheetQueryConfig::in_memory()
    };
    let (sq, upload_id) = ingested(SheetQuery::new(config).unwrap());

    let outcome = sq.ask(&upload_id, "What is the total?").unwrap();
    match outcome {
        QueryOutcome::Answered {
            row_count, chart, ..
        } => {
            assert_eq!(row_count, 4);
            assert_eq!(chart.chart_type(), VisualizationType::Bar);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_translated_answer() {
    let (sq, upload_id) = ingested(in_memory().with_translator(MockProvider::new()));
    assert_eq!(sq.translator_name(), Some("mock"));

    let outcome = sq.ask(&upload_id, "How many rows are there?").unwrap();
    match outcome {
        QueryOutcome::Answered {
            data,
            translated,
            row_count,
            chart,
            ..
        } => {
            assert!(translated);
            assert_eq!(row_count, 1);
            assert_eq!(data[0]["row_count"], CellValue::Integer(10));
            assert!(matches!(chart, Chart::Table { .. }));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_failing_translator_falls_back() {
    let (sq, upload_id) = ingested(
        in_memory().with_translator(MockProvider::failing("service unavailable")),
    );

    let outcome = sq.ask(&upload_id, "anything").unwrap();
    match outcome {
        QueryOutcome::Answered {
            translated,
            explanation,
            ..
        } => {
            assert!(!translated);
            assert_eq!(explanation, "Showing raw data overview");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_unparseable_reply_falls_back() {
    let (sq, upload_id) =
        ingested(in_memory().with_translator(MockProvider::with_reply("I cannot help with that")));

    let outcome = sq.ask(&upload_id, "anything").unwrap();
    assert!(matches!(
        outcome,
        QueryOutcome::Answered {
            translated: false,
            ..
        }
    ));
}

#[test]
fn test_bad_sql_is_a_soft_failure() {
    let (sq, upload_id) = ingested(in_memory().with_translator(MockProvider::with_reply(
        r#"```json
{"sql_query": "SELECT missing_column FROM nowhere", "visualization_type": "bar",
 "explanation": "Totals per region", "insights": "North leads"}
```"#,
    )));

    let outcome = sq.ask(&upload_id, "Total by region").unwrap();
    assert!(!outcome.is_success());
    match outcome {
        QueryOutcome::Failed {
            error,
            fallback_explanation,
        } => {
            assert!(error.starts_with("SQL execution error"));
            assert_eq!(fallback_explanation, "Totals per region");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_pie_over_shared_backend() {
    let backend: Arc<dyn RelationalStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let (_, upload_id) = ingested(SheetQuery::with_backend(
        SheetQueryConfig::in_memory(),
        Arc::clone(&backend),
    ));

    let reply = json!({
        "sql_query": format!(
            "SELECT \"Region\", SUM(\"Units\") AS units FROM \"{}_Sales\" GROUP BY \"Region\" ORDER BY units DESC",
            upload_id
        ),
        "visualization_type": "pie",
        "explanation": "Units per region",
        "insights": ""
    })
    .to_string();
    let sq = SheetQuery::with_backend(SheetQueryConfig::in_memory(), backend)
        .with_translator(MockProvider::with_reply(reply));

    let outcome = sq.ask(&upload_id, "Units per region").unwrap();
    match outcome {
        QueryOutcome::Answered { chart, row_count, .. } => {
            assert_eq!(row_count, 4);
            match chart {
                Chart::Figure { chart_type, figure } => {
                    assert_eq!(chart_type, VisualizationType::Pie);
                    let values = figure["data"][0]["values"].as_array().unwrap();
                    let total: f64 = values.iter().map(|v| v.as_f64().unwrap()).sum();
                    assert_eq!(total, 55.0);
                }
                other => panic!("expected a figure, got {other:?}"),
            }
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_outcome_serialization() {
    let (sq, upload_id) = ingested(in_memory().with_translator(MockProvider::new()));

    let answered = serde_json::to_value(sq.ask(&upload_id, "how many?").unwrap()).unwrap();
    assert_eq!(answered["success"], true);
    assert_eq!(answered["row_count"], 1);
    assert_eq!(answered["chart"]["type"], "table");
    assert_eq!(answered["data"], json!([{"row_count": 10}]));

    let failed = QueryOutcome::Failed {
        error: "SQL execution error: boom".to_string(),
        fallback_explanation: "Totals".to_string(),
    };
    assert_eq!(
        serde_json::to_value(failed).unwrap(),
        json!({
            "success": false,
            "error": "SQL execution error: boom",
            "fallback_explanation": "Totals"
        })
    );
}

#[test]
fn test_empty_question_is_rejected() {
    let (sq, upload_id) = ingested(in_memory());
    let err = sq.ask(&upload_id, "   ").unwrap_err();
    assert!(matches!(err, SheetQueryError::Validation(_)));
}

#[test]
fn test_unknown_upload() {
    let err = in_memory().ask("table_abcdef12", "how many?").unwrap_err();
    assert!(matches!(err, SheetQueryError::NotFound { .. }));
}

#[test]
fn test_table_info_serialization() {
    let (sq, upload_id) = ingested(in_memory());
    let info = serde_json::to_value(sq.table_info(&upload_id).unwrap()).unwrap();

    assert_eq!(info["table_id"], upload_id.as_str());
    let sales = &info["tables"][0];
    assert_eq!(sales["sheet_name"], "Sales");
    assert_eq!(sales["dtypes"]["Date"], "DATETIME");
    assert_eq!(sales["columns"], json!(["Date", "Amount", "Units", "Region"]));
}
