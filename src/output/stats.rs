//! Crawl statistics for a listing run

use crate::crawler::StopReason;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Listing pages whose product links were read
    pub listing_pages: usize,

    /// Product links returned by pagination
    pub links_collected: usize,

    /// Distinct URLs that entered the frontier
    pub unique_links: usize,

    /// Product pages that produced a record
    pub products_extracted: usize,

    /// Product pages that produced no record
    pub products_failed: usize,

    /// Why pagination stopped
    pub stop_reason: StopReason,

    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Extracted products as a percentage of attempted ones
    pub fn success_rate(&self) -> f64 {
        let attempted = self.products_extracted + self.products_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.products_extracted as f64 / attempted as f64) * 100.0
    }

    /// Logs the summary at info level
    pub fn log(&self) {
        tracing::info!(
            "Crawl finished in {:.1}s: {} listing pages, {} links ({} unique), {} extracted, {} failed, stopped: {}",
            self.elapsed.as_secs_f64(),
            self.listing_pages,
            self.links_collected,
            self.unique_links,
            self.products_extracted,
            self.products_failed,
            self.stop_reason
        );
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Pagination:");
    println!("  Listing pages visited: {}", stats.listing_pages);
    println!("  Product links collected: {}", stats.links_collected);
    println!("  Unique product URLs: {}", stats.unique_links);
    println!("  Stopped: {}", stats.stop_reason);
    println!();

    println!("Extraction:");
    println!("  Products extracted: {}", stats.products_extracted);
    println!("  Products failed: {}", stats.products_failed);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} product pages) in {:.1}s",
        stats.success_rate(),
        stats.products_extracted,
        stats.products_extracted + stats.products_failed,
        stats.elapsed.as_secs_f64()
    );
}
