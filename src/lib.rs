//! Meli-Scout: a polite marketplace product scraper
//!
//! This crate walks marketplace search-result pages with a headless browser,
//! collects product links up to a fixed budget, extracts structured product
//! records from each product page and exports them to CSV.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Meli-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Extraction failed: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid selector '{name}': {reason}")]
    InvalidSelector { name: String, reason: String },
}

/// Result type alias for Meli-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{CurrencyCode, Price, ProductRecord, StoreInfo};
pub use state::UrlStatus;
pub use url::{classify_url, normalize_url_base, UrlKind};
