//! Output error type and the exporter trait

use crate::model::ProductRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes a batch of product records to a named destination
///
/// Implementations decide where `name` lands (a directory, a bucket, ...)
/// and return the path of what they wrote.
pub trait RecordExporter {
    /// Exports `records` under `name`
    ///
    /// # Arguments
    ///
    /// * `records` - Records in the order they should appear
    /// * `name` - Base name of the export, without extension
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Location of the written export
    /// * `Err(OutputError)` - Writing failed
    fn export(&self, records: &[ProductRecord], name: &str) -> OutputResult<PathBuf>;
}
