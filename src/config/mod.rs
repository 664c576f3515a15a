//! Configuration module for Meli-Scout
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a built-in default, so running without
//! a file is the common case.
//!
//! # Example
//!
//! ```no_run
//! use meli_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("meli-scout.toml")).unwrap();
//! println!("Will collect up to {} products", config.crawl.max_items);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlConfig, Engine, OutputConfig, SelectorConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
