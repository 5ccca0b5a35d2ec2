//! Ask command - answer a question about an upload.

use std::io;

use colored::Colorize;
use indexmap::IndexMap;
use sheetquery::{CellValue, QueryOutcome};

use crate::cli::OutputFormat;

use super::Session;

/// Rows printed in table format.
const DISPLAY_ROWS: usize = 50;
/// Widest column printed in table format.
const MAX_CELL_WIDTH: usize = 30;

type Record = IndexMap<String, CellValue>;

pub fn run(
    session: &Session,
    upload_id: &str,
    question: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let sq = session.open()?;
    let outcome = sq.ask(upload_id, question)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        QueryOutcome::Answered {
            data,
            chart,
            explanation,
            insights,
            row_count,
            translated,
        } => {
            if format == OutputFormat::Csv {
                return write_csv(&data);
            }

            if !translated {
                println!(
                    "{}",
                    "No translation available; showing a generic overview.".yellow()
                );
            }
            println!("{} {}", "Explanation:".cyan().bold(), explanation);
            println!("{} {}", "Insights:".cyan().bold(), insights);
            println!(
                "{} {} ({} rows)",
                "Chart:".cyan().bold(),
                chart.chart_type(),
                row_count
            );
            println!();
            print_table(&data);
            Ok(())
        }
        QueryOutcome::Failed {
            error,
            fallback_explanation,
        } => {
            eprintln!("{} {}", "Intended:".yellow(), fallback_explanation);
            Err(error.into())
        }
    }
}

fn write_csv(data: &[Record]) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(io::stdout());

    if let Some(first) = data.first() {
        writer.write_record(first.keys())?;
    }
    for record in data {
        writer.write_record(record.values().map(|v| v.to_string()))?;
    }

    writer.flush()?;
    Ok(())
}

fn print_table(data: &[Record]) {
    let Some(first) = data.first() else {
        println!("{}", "(no rows)".dimmed());
        return;
    };

    let shown = &data[..data.len().min(DISPLAY_ROWS)];
    let headers: Vec<&String> = first.keys().collect();
    let cells: Vec<Vec<String>> = shown
        .iter()
        .map(|r| r.values().map(|v| truncate(&v.to_string())).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(truncate(h).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:w$}", truncate(h), w = *w))
        .collect();
    println!("{}", header_line.join("  ").bold());

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:w$}", c, w = *w))
            .collect();
        println!("{}", line.join("  "));
    }

    if data.len() > shown.len() {
        println!(
            "{}",
            format!("... {} more rows", data.len() - shown.len()).dimmed()
        );
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(MAX_CELL_WIDTH - 3).collect();
        out.push_str("...");
        out
    }
}
