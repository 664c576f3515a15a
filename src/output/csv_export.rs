//! CSV export of product records
//!
//! Files land at `<csv-dir>/<slug>-<unix-epoch-seconds>.csv`. The header row
//! is fixed; absent optional values are written as empty fields and image
//! URLs are joined with `;`.

use crate::config::OutputConfig;
use crate::model::ProductRecord;
use crate::output::traits::{OutputResult, RecordExporter};
use std::fs::{DirBuilder, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

/// Column names of the CSV export, in order
pub const CSV_HEADERS: [&str; 14] = [
    "Title",
    "Price_Amount_Cents",
    "Price_Currency",
    "URL",
    "Review_Count",
    "Rating",
    "Image_URLs",
    "Sold_More_Than",
    "Description_Content",
    "Images",
    "Store_Name",
    "Store_URL",
    "Store_Logo_Image_Src",
    "Store_Logo_Image_Src_Original",
];

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Renders one record as a CSV row matching [`CSV_HEADERS`]
pub fn record_row(record: &ProductRecord) -> [String; 14] {
    [
        record.title.clone(),
        record.price.amount_cents.to_string(),
        record.price.currency.code().to_string(),
        record.url.clone(),
        optional(record.review_count),
        record
            .rating
            .map(|rating| format!("{:.2}", rating))
            .unwrap_or_default(),
        record.image_urls.join(";"),
        optional(record.sold_at_least),
        record.description.clone(),
        record.image_urls.len().to_string(),
        record.store.name.clone(),
        record.store.url.clone(),
        optional(record.store.logo_url.as_deref()),
        optional(record.store.logo_url_original.as_deref()),
    ]
}

/// Writes the header and one row per record to `writer`
pub fn write_records<W: Write>(writer: W, records: &[ProductRecord]) -> OutputResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;
    for record in records {
        csv_writer.write_record(record_row(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Derives a file name slug from a listing URL's path
///
/// The leading `/` is dropped and the remaining `/` become `-`. An empty
/// path (or a string that is not a URL) gives `products`.
///
/// # Examples
///
/// ```
/// use meli_scout::output::csv_slug;
///
/// assert_eq!(csv_slug("https://listado.mercadolibre.com.pe/teclado-mecanico"), "teclado-mecanico");
/// assert_eq!(csv_slug("https://listado.mercadolibre.com.pe/computacion/teclados"), "computacion-teclados");
/// assert_eq!(csv_slug("https://listado.mercadolibre.com.pe/"), "products");
/// ```
pub fn csv_slug(listing_url: &str) -> String {
    let path = match Url::parse(listing_url.trim()) {
        Ok(url) => url.path().to_string(),
        Err(_) => return "products".to_string(),
    };

    let slug = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "products".to_string()
    } else {
        slug
    }
}

/// Path of the export for `slug` written at `timestamp`
pub fn csv_file_path(dir: &Path, slug: &str, timestamp: i64) -> PathBuf {
    dir.join(format!("{}-{}.csv", slug, timestamp))
}

/// Creates `dir` (and parents) with mode 0755 on unix
pub fn ensure_output_dir(dir: &Path) -> OutputResult<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)?;
    Ok(())
}

/// Writes `records` to a new timestamped CSV file in `dir`
///
/// # Arguments
///
/// * `records` - The records to export
/// * `dir` - Output directory, created if missing
/// * `slug` - File name prefix (see [`csv_slug`])
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(OutputError)` - Directory creation or writing failed
pub fn write_products_csv(
    records: &[ProductRecord],
    dir: &Path,
    slug: &str,
) -> OutputResult<PathBuf> {
    ensure_output_dir(dir)?;

    let path = csv_file_path(dir, slug, chrono::Utc::now().timestamp());
    let file = File::create(&path)?;
    write_records(file, records)?;

    tracing::info!("Wrote {} products to {}", records.len(), path.display());
    Ok(path)
}

/// Exporter writing timestamped CSV files into one directory
#[derive(Debug, Clone)]
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.csv_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RecordExporter for CsvExporter {
    fn export(&self, records: &[ProductRecord], name: &str) -> OutputResult<PathBuf> {
        write_products_csv(records, &self.dir, name)
    }
}
