//! Pagination over listing pages
//!
//! Walks search-result pages collecting product links until the target is
//! met or the site runs out of pages. Each iteration checks, in order:
//! 1. target reached → stop
//! 2. no "next page" control → stop (exhausted)
//! 3. clicking "next page" fails → stop with partial links
//! 4. the new page's first product link never attaches → stop with partial links
//!
//! A page that was already read, or that yields no product links, also ends
//! the walk so a "next page" control that cycles cannot loop forever.
//!
//! Between page transitions a randomized politeness delay is applied.

use crate::browser::{PageHandle, WaitState};
use crate::config::Config;
use crate::crawler::parser::collect_page_links;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// Why pagination stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Collected exactly the target number of links
    TargetReached,
    /// No "next page" control on the last page
    Exhausted,
    /// The listing page itself could not be loaded
    ListingUnavailable(String),
    /// Reading product links from a page failed
    LinkExtractionFailed(String),
    /// The "next page" control could not be clicked
    ClickFailed(String),
    /// The next page's product links did not appear in time
    NextPageTimeout(String),
    /// "Next page" led back to a listing page already read
    PageRevisited(String),
}

impl StopReason {
    /// True when pagination ended because of an error rather than completion
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            StopReason::TargetReached | StopReason::Exhausted | StopReason::PageRevisited(_)
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TargetReached => write!(f, "target reached"),
            StopReason::Exhausted => write!(f, "no more pages"),
            StopReason::ListingUnavailable(e) => write!(f, "listing unavailable: {}", e),
            StopReason::LinkExtractionFailed(e) => write!(f, "link extraction failed: {}", e),
            StopReason::ClickFailed(e) => write!(f, "next page click failed: {}", e),
            StopReason::NextPageTimeout(e) => write!(f, "next page did not load: {}", e),
            StopReason::PageRevisited(url) => write!(f, "pagination looped back to {}", url),
        }
    }
}

/// Links collected by one pagination run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOutcome {
    /// Product links in discovery order, at most the target count
    pub links: Vec<String>,
    /// Listing pages whose links were read
    pub pages_visited: usize,
    pub stop: StopReason,
}

/// Randomized delay between page transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolitenessDelay {
    min: Duration,
    max: Duration,
}

impl PolitenessDelay {
    /// Creates a delay drawn uniformly from `[min, max]`; swapped bounds are reordered
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draws one delay
    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if min == max {
            return self.min;
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }

    pub async fn wait(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tracing::debug!("Waiting {:?} before the next page", delay);
            tokio::time::sleep(delay).await;
        }
    }
}

/// Listing-page walker
#[derive(Debug, Clone)]
pub struct Paginator {
    product_links_selector: String,
    next_page_selector: String,
    link_denylist: Vec<String>,
    navigation_timeout: Duration,
    listing_timeout: Duration,
    next_page_timeout: Duration,
    delay: PolitenessDelay,
}

impl Paginator {
    pub fn from_config(config: &Config) -> Self {
        Self {
            product_links_selector: config.selectors.product_links.clone(),
            next_page_selector: config.selectors.next_page.clone(),
            link_denylist: config.crawl.link_denylist.clone(),
            navigation_timeout: config.browser.navigation_timeout(),
            listing_timeout: config.browser.selector_timeout(),
            next_page_timeout: config.browser.next_page_timeout(),
            delay: PolitenessDelay::from_millis(
                config.crawl.min_delay_ms,
                config.crawl.max_delay_ms,
            ),
        }
    }

    /// Replaces the politeness delay
    pub fn with_delay(mut self, delay: PolitenessDelay) -> Self {
        self.delay = delay;
        self
    }

    /// Loads `listing_url` and paginates from it
    ///
    /// A listing that fails to load, or whose product links never attach,
    /// yields an empty outcome rather than an error.
    pub async fn crawl<P: PageHandle>(
        &self,
        page: &P,
        listing_url: &str,
        target: usize,
    ) -> PaginationOutcome {
        tracing::info!("Opening listing {}", listing_url);

        let opened = match page.goto(listing_url, self.navigation_timeout).await {
            Ok(()) => {
                page.wait_for(
                    &self.product_links_selector,
                    WaitState::Attached,
                    self.listing_timeout,
                )
                .await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = opened {
            tracing::warn!("Listing {} unavailable: {}", listing_url, e);
            return PaginationOutcome {
                links: Vec::new(),
                pages_visited: 0,
                stop: StopReason::ListingUnavailable(e.to_string()),
            };
        }

        self.collect(page, target).await
    }

    /// Collects up to `target` product links starting from the loaded page
    ///
    /// # Arguments
    ///
    /// * `page` - A page showing the first listing page
    /// * `target` - Maximum number of links to return
    ///
    /// # Returns
    ///
    /// The collected links (never more than `target`) and why collection stopped
    pub async fn collect<P: PageHandle>(&self, page: &P, target: usize) -> PaginationOutcome {
        let mut links: Vec<String> = Vec::new();
        let mut pages_visited = 0;
        let mut seen_pages: HashSet<String> = HashSet::new();

        let stop = loop {
            if links.len() >= target {
                break StopReason::TargetReached;
            }

            match page.current_url().await {
                Ok(current) => {
                    if !seen_pages.insert(current.clone()) {
                        tracing::warn!("Listing page {} was already read, stopping", current);
                        break StopReason::PageRevisited(current);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to read listing page URL: {}", e);
                    break StopReason::LinkExtractionFailed(e.to_string());
                }
            }

            let page_links =
                match collect_page_links(page, &self.product_links_selector, &self.link_denylist)
                    .await
                {
                    Ok(page_links) => page_links,
                    Err(e) => {
                        tracing::warn!("Failed to read product links: {}", e);
                        break StopReason::LinkExtractionFailed(e.to_string());
                    }
                };
            pages_visited += 1;

            let remaining = target - links.len();
            let found = page_links.len();
            links.extend(page_links.into_iter().take(remaining));
            tracing::info!(
                "Page {}: {} product links ({} kept, {}/{} total)",
                pages_visited,
                found,
                found.min(remaining),
                links.len(),
                target
            );

            if links.len() >= target {
                break StopReason::TargetReached;
            }

            if found == 0 {
                tracing::warn!("Page {} has no product links, stopping", pages_visited);
                break StopReason::Exhausted;
            }

            match page.count(&self.next_page_selector).await {
                Ok(0) => {
                    tracing::info!("No more pages after page {}", pages_visited);
                    break StopReason::Exhausted;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to probe next page control: {}", e);
                    break StopReason::ClickFailed(e.to_string());
                }
            }

            if let Err(e) = page
                .click(&self.next_page_selector, self.navigation_timeout)
                .await
            {
                tracing::warn!("Failed to open page {}: {}", pages_visited + 1, e);
                break StopReason::ClickFailed(e.to_string());
            }

            if let Err(e) = page
                .wait_for(
                    &self.product_links_selector,
                    WaitState::Attached,
                    self.next_page_timeout,
                )
                .await
            {
                tracing::warn!("Page {} never showed products: {}", pages_visited + 1, e);
                break StopReason::NextPageTimeout(e.to_string());
            }

            self.delay.wait().await;
        };

        tracing::info!(
            "Collected {} product links across {} pages ({})",
            links.len(),
            pages_visited,
            stop
        );

        PaginationOutcome {
            links,
            pages_visited,
            stop,
        }
    }
}
