//! Info command - show the tables stored for an upload.

use colored::Colorize;

use super::Session;

pub fn run(
    session: &Session,
    upload_id: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let sq = session.open()?;
    let info = sq.table_info(upload_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", "Upload".cyan().bold(), info.table_id.white().bold());
    if let Some(first) = info.tables.first() {
        println!("  File: {}", first.filename);
    }
    println!();

    for record in &info.tables {
        println!(
            "{} {} ({} rows, {} columns)",
            record.sheet_name.yellow().bold(),
            record.table_name,
            record.row_count,
            record.col_count
        );
        println!("  Created: {}", record.created_at);

        for column in &record.columns {
            let kind = record
                .dtypes
                .get(column)
                .map(|k| k.to_string())
                .unwrap_or_default();
            println!("    {:30} {}", column, kind.blue());
        }
        println!();
    }

    Ok(())
}
