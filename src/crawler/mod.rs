//! Crawler module for listing pagination and product scraping
//!
//! This module contains the core crawling logic, including:
//! - The deduplicating URL frontier
//! - Product link collection from listing pages
//! - Pagination with politeness delays
//! - Overall scrape coordination

mod coordinator;
mod frontier;
mod paginator;
mod parser;

pub use coordinator::{Coordinator, ListingReport};
pub use frontier::UrlFrontier;
pub use paginator::{PaginationOutcome, Paginator, PolitenessDelay, StopReason};
pub use parser::{collect_page_links, filter_product_links};
