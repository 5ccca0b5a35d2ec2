//! Builds small .xlsx workbooks in memory for tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One cell of a fixture sheet.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

pub fn t(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

pub fn n(v: f64) -> Cell {
    Cell::Number(v)
}

/// A sheet: name plus rows, first row being the header.
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }
}

/// Sales sheet: Date, Amount, Units, Region with ten data rows and one
/// fully blank row in the middle.
pub fn sales_sheet() -> Sheet {
    let regions = ["North", "South", "East", "West"];
    let mut rows = vec![vec![t("Date"), t("Amount"), t("Units"), t("Region")]];
    for i in 0..10 {
        if i == 5 {
            rows.push(vec![Cell::Blank, Cell::Blank, Cell::Blank, Cell::Blank]);
        }
        rows.push(vec![
            t(&format!("2024-01-{:02}", i + 1)),
            n(100.0 + i as f64 * 12.5),
            n((i + 1) as f64),
            t(&format!(" {} ", regions[i % regions.len()])),
        ]);
    }
    Sheet::new("Sales", rows)
}

/// Sheet whose first header cell is blank, with five data rows.
pub fn unnamed_sheet() -> Sheet {
    let mut rows = vec![vec![Cell::Blank, t("Value")]];
    for i in 0..5 {
        rows.push(vec![t(&format!("item-{}", i)), n(i as f64)]);
    }
    Sheet::new("Unnamed", rows)
}

/// Serialize sheets into .xlsx bytes.
pub fn xlsx(sheets: &[Sheet]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut add = |name: &str, content: String| {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    };

    add("[Content_Types].xml", content_types(sheets.len()));
    add("_rels/.rels", ROOT_RELS.to_string());
    add("xl/workbook.xml", workbook(sheets));
    add("xl/_rels/workbook.xml.rels", workbook_rels(sheets.len()));
    for (i, sheet) in sheets.iter().enumerate() {
        add(&format!("xl/worksheets/sheet{}.xml", i + 1), worksheet(sheet));
    }

    zip.finish().unwrap().into_inner()
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

fn content_types(count: usize) -> String {
    let overrides: String = (1..=count)
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{}</Types>"#,
        overrides
    )
}

fn workbook(sheets: &[Sheet]) -> String {
    let entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(&s.name),
                i + 1,
                i + 1
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
        entries
    )
}

fn workbook_rels(count: usize) -> String {
    let entries: String = (1..=count)
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i, i
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        entries
    )
}

fn worksheet(sheet: &Sheet) -> String {
    let mut rows = String::new();
    for (r, row) in sheet.rows.iter().enumerate() {
        let cells: String = row
            .iter()
            .enumerate()
            .filter_map(|(c, cell)| {
                let reference = format!("{}{}", column_letters(c), r + 1);
                match cell {
                    Cell::Blank => None,
                    Cell::Text(s) => Some(format!(
                        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                        reference,
                        escape(s)
                    )),
                    Cell::Number(v) => Some(format!(r#"<c r="{}"><v>{}</v></c>"#, reference, v)),
                }
            })
            .collect();
        if !cells.is_empty() {
            rows.push_str(&format!(r#"<row r="{}">{}</row>"#, r + 1, cells));
        }
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        rows
    )
}

fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
