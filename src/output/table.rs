//! Aligned terminal rendering of a CSV file
//!
//! ```text
//! +-------+-------+
//! | Title | Price |
//! +-------+-------+
//! | Mouse | 5000  |
//! +-------+-------+
//! ```

use crate::output::traits::OutputResult;
use std::path::Path;

/// Reads every row of a CSV file, header included
pub fn read_csv_rows(path: &Path) -> OutputResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn width(field: &str) -> usize {
    field.chars().count()
}

fn separator(widths: &[usize]) -> String {
    let mut line = String::new();
    for w in widths {
        line.push('+');
        line.push_str(&"-".repeat(w + 2));
    }
    line.push('+');
    line
}

fn row_line(row: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, w) in widths.iter().enumerate() {
        let field = row.get(i).map(String::as_str).unwrap_or("");
        line.push_str("| ");
        line.push_str(field);
        line.push_str(&" ".repeat(w - width(field) + 1));
    }
    line.push('|');
    line
}

/// Formats rows as a boxed table; the first row is the header
///
/// Column widths follow the header row. Returns an empty string for no rows.
pub fn format_table(rows: &[Vec<String>]) -> String {
    let Some(header) = rows.first() else {
        return String::new();
    };

    let mut widths: Vec<usize> = header.iter().map(|h| width(h)).collect();
    for row in &rows[1..] {
        for (i, field) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(width(field));
        }
    }

    let rule = separator(&widths);
    let mut lines = vec![rule.clone(), row_line(header, &widths), rule.clone()];
    lines.extend(rows[1..].iter().map(|row| row_line(row, &widths)));
    lines.push(rule);
    lines.join("\n")
}

/// Reads a CSV file back and prints it as an aligned table
pub fn print_csv_table(path: &Path) -> OutputResult<()> {
    let rows = read_csv_rows(path)?;
    if rows.is_empty() {
        println!("CSV file is empty");
        return Ok(());
    }
    println!("{}", format_table(&rows));
    Ok(())
}
