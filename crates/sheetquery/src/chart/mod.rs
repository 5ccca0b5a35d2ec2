//! Chart rendering of query results as plotly-compatible JSON.
//!
//! Rendering never fails: anything that cannot be drawn as the requested
//! chart comes back as a table of the first rows.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use tracing::debug;

use crate::schema::CellValue;
use crate::store::ResultSet;
use crate::translate::VisualizationType;

/// Rows drawn in a bar chart.
pub const BAR_ROWS: usize = 20;
/// Rows drawn in a line chart.
pub const LINE_ROWS: usize = 50;
/// Slices in a pie chart.
pub const PIE_SLICES: usize = 10;
/// Points in a scatter plot.
pub const SCATTER_ROWS: usize = 100;
/// Rows in a table rendering.
pub const TABLE_ROWS: usize = 100;
/// Rows in a table that replaces a chart which could not be drawn.
pub const FALLBACK_TABLE_ROWS: usize = 50;

/// A rendered result.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    /// A plotly figure with `data` traces and a `layout`.
    Figure {
        chart_type: VisualizationType,
        figure: Value,
    },
    /// Plain records.
    Table {
        data: Vec<IndexMap<String, CellValue>>,
    },
}

impl Chart {
    /// Chart kind as sent to clients.
    pub fn chart_type(&self) -> VisualizationType {
        match self {
            Chart::Figure { chart_type, .. } => *chart_type,
            Chart::Table { .. } => VisualizationType::Table,
        }
    }

    fn table(result: &ResultSet, rows: usize) -> Self {
        Chart::Table {
            data: result.records(rows),
        }
    }
}

impl Serialize for Chart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", &self.chart_type())?;
        match self {
            Chart::Figure { figure, .. } => map.serialize_entry("plotly_json", figure)?,
            Chart::Table { data } => map.serialize_entry("data", data)?,
        }
        map.end()
    }
}

/// Render a result set as the requested chart kind.
///
/// - empty result: empty table
/// - bar / line: first 20 / 50 rows, x from column 0 and y from column 1,
///   or y only (x = row index) with a single column
/// - pie: with two or more columns, column 1 summed per distinct column 0
///   value; otherwise value counts of column 0; at most 10 slices
/// - scatter: first 100 rows, needs two columns, else a 50-row table
/// - table / heatmap: 100-row table
///
/// A chart that cannot be drawn (e.g. non-numeric pie values) becomes a
/// 50-row table.
pub fn render(result: &ResultSet, viz: VisualizationType) -> Chart {
    if result.is_empty() || result.columns.is_empty() {
        return Chart::Table { data: Vec::new() };
    }

    let figure = match viz {
        VisualizationType::Bar => Ok(cartesian(result, BAR_ROWS, json!({"type": "bar"}))),
        VisualizationType::Line => Ok(cartesian(
            result,
            LINE_ROWS,
            json!({"type": "scatter", "mode": "lines"}),
        )),
        VisualizationType::Pie => pie(result),
        VisualizationType::Scatter if result.columns.len() >= 2 => Ok(cartesian(
            result,
            SCATTER_ROWS,
            json!({"type": "scatter", "mode": "markers"}),
        )),
        VisualizationType::Scatter => return Chart::table(result, FALLBACK_TABLE_ROWS),
        VisualizationType::Table | VisualizationType::Heatmap => {
            return Chart::table(result, TABLE_ROWS)
        }
    };

    match figure {
        Ok(figure) => Chart::Figure {
            chart_type: viz,
            figure,
        },
        Err(reason) => {
            debug!(chart = %viz, reason = %reason, "chart fell back to table");
            Chart::table(result, FALLBACK_TABLE_ROWS)
        }
    }
}

/// Bar, line and scatter share the x/y layout.
fn cartesian(result: &ResultSet, limit: usize, mut trace: Value) -> Value {
    let rows = &result.rows[..result.rows.len().min(limit)];

    let (x, y, x_title, y_title) = if result.columns.len() >= 2 {
        (
            rows.iter().map(|r| json!(r[0])).collect::<Vec<_>>(),
            rows.iter().map(|r| json!(r[1])).collect::<Vec<_>>(),
            result.columns[0].as_str(),
            result.columns[1].as_str(),
        )
    } else {
        (
            (0..rows.len()).map(|i| json!(i)).collect(),
            rows.iter().map(|r| json!(r[0])).collect(),
            "index",
            result.columns[0].as_str(),
        )
    };

    trace["x"] = Value::Array(x);
    trace["y"] = Value::Array(y);

    json!({
        "data": [trace],
        "layout": {
            "xaxis": {"title": {"text": x_title}},
            "yaxis": {"title": {"text": y_title}}
        }
    })
}

fn pie(result: &ResultSet) -> Result<Value, String> {
    let (labels, values): (Vec<String>, Vec<f64>) = if result.columns.len() >= 2 {
        let mut sums: IndexMap<String, f64> = IndexMap::new();
        for row in &result.rows {
            if row[0].is_null() {
                continue;
            }
            let value = match &row[1] {
                CellValue::Null => 0.0,
                other => other
                    .as_f64()
                    .ok_or_else(|| format!("non-numeric pie value '{}'", other))?,
            };
            *sums.entry(row[0].to_string()).or_insert(0.0) += value;
        }
        sums.into_iter().take(PIE_SLICES).unzip()
    } else {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for value in result.column_values(0).filter(|v| !v.is_null()) {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
        // stable: ties keep first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(PIE_SLICES)
            .map(|(label, count)| (label, count as f64))
            .unzip()
    };

    if labels.is_empty() {
        return Err("no values to plot".to_string());
    }

    Ok(json!({
        "data": [{"type": "pie", "labels": labels, "values": values}],
        "layout": {}
    }))
}
