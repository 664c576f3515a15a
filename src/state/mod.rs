//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `UrlStatus`: Tracks whether a frontier URL is pending, visited or failed

mod url_status;

pub use url_status::UrlStatus;
