//! Output module for exporting and reviewing scraped products
//!
//! This module handles:
//! - Writing product records to timestamped CSV files
//! - Printing a written CSV back as an aligned table
//! - Printing single records and image lists
//! - Reporting crawl statistics

mod csv_export;
pub mod stats;
mod table;
mod traits;

pub use csv_export::{
    csv_file_path, csv_slug, ensure_output_dir, record_row, write_products_csv, write_records,
    CsvExporter, CSV_HEADERS,
};
pub use stats::{print_statistics, CrawlStatistics};
pub use table::{format_table, print_csv_table, read_csv_rows};
pub use traits::{OutputError, OutputResult, RecordExporter};

use crate::model::ProductRecord;

/// Renders a record as pretty-printed JSON
pub fn format_record(record: &ProductRecord) -> OutputResult<String> {
    serde_json::to_string_pretty(record).map_err(|e| OutputError::Format(e.to_string()))
}

/// Prints a record as pretty-printed JSON
pub fn print_record(record: &ProductRecord) -> OutputResult<()> {
    println!("{}", format_record(record)?);
    Ok(())
}

/// Prints image URLs one per line, numbered
pub fn print_image_urls(urls: &[String]) {
    if urls.is_empty() {
        println!("No product images found");
        return;
    }
    for (i, url) in urls.iter().enumerate() {
        println!("{:>3}. {}", i + 1, url);
    }
}
