//! Ingest command - load a workbook into the database.

use std::path::PathBuf;

use colored::Colorize;

use super::Session;

pub fn run(session: &Session, file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    println!(
        "{} {}",
        "Ingesting".cyan().bold(),
        file.display().to_string().white()
    );

    let sq = session.open()?;
    let summary = sq.ingest_file(&file)?;

    println!(
        "Stored {} sheet(s) as {}",
        summary.sheets.len().to_string().white().bold(),
        summary.upload_id.green().bold()
    );
    println!();

    for (sheet_name, sheet) in &summary.sheets {
        let (rows, cols) = sheet.shape;
        println!(
            "  {:24} {} ({} rows, {} columns)",
            sheet_name.yellow(),
            sheet.table_name,
            rows,
            cols
        );

        if session.verbose {
            for (column, kind) in &sheet.dtypes {
                println!("      {:30} {}", column, kind.to_string().blue());
            }
        }
    }

    if summary.sheets.is_empty() {
        println!("{}", "No sheet had any columns; nothing to query.".yellow());
        return Ok(());
    }

    println!();
    println!(
        "Run {} to query it",
        format!("sheetquery ask {} \"<question>\"", summary.upload_id)
            .cyan()
            .bold()
    );

    Ok(())
}
