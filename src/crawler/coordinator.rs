//! Crawler coordinator - main scrape orchestration logic
//!
//! This module wires the pieces together for the three run modes:
//! - listing: paginate, queue links in the frontier, extract each product
//! - product: extract a single product page
//! - images: read only a product page's image URLs
//!
//! Every product is loaded in a fresh page with all resources allowed;
//! listing pages use the configured blocking policy. A product that fails
//! to load or extract is recorded as failed and the batch continues.

use crate::browser::{BrowserSession, PageHandle, ResourcePolicy};
use crate::config::Config;
use crate::crawler::frontier::UrlFrontier;
use crate::crawler::paginator::Paginator;
use crate::extract::{ExtractError, ProductExtractor};
use crate::model::ProductRecord;
use crate::output::CrawlStatistics;
use crate::state::UrlStatus;
use crate::ScoutError;
use std::time::{Duration, Instant};

/// Records and statistics of one listing run
#[derive(Debug, Clone)]
pub struct ListingReport {
    /// Extracted records in link discovery order
    pub records: Vec<ProductRecord>,
    pub stats: CrawlStatistics,
}

/// Main scrape coordinator, owning the browser session
pub struct Coordinator<S: BrowserSession> {
    session: S,
    config: Config,
    extractor: ProductExtractor,
    paginator: Paginator,
}

impl<S: BrowserSession> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `session` - A running browser session; released by [`Coordinator::shutdown`]
    /// * `config` - The scraper configuration
    pub fn new(session: S, config: Config) -> Self {
        let extractor = ProductExtractor::from_config(&config);
        let paginator = Paginator::from_config(&config);
        Self {
            session,
            config,
            extractor,
            paginator,
        }
    }

    /// Replaces the paginator (custom delays)
    pub fn with_paginator(mut self, paginator: Paginator) -> Self {
        self.paginator = paginator;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn navigation_timeout(&self) -> Duration {
        self.config.browser.navigation_timeout()
    }

    /// Scrapes up to `max_items` products reachable from a listing URL
    ///
    /// This method:
    /// 1. Paginates the listing with resource blocking enabled
    /// 2. Queues the collected links in a frontier (deduplicating them)
    /// 3. Extracts each pending link in a fresh page
    /// 4. Marks each link visited or failed
    ///
    /// # Returns
    ///
    /// * `Ok(ListingReport)` - Records (possibly none) and statistics
    /// * `Err(ScoutError)` - The browser could not open a page at all
    pub async fn scrape_listing(
        &self,
        listing_url: &str,
        max_items: usize,
    ) -> Result<ListingReport, ScoutError> {
        let start_time = Instant::now();

        let listing_page = self
            .session
            .new_page(ResourcePolicy::from_config(&self.config.browser))
            .await?;
        let outcome = self
            .paginator
            .crawl(&listing_page, listing_url, max_items)
            .await;
        if let Err(e) = listing_page.close().await {
            tracing::warn!("Failed to close listing page: {} (non-fatal)", e);
        }

        let frontier = UrlFrontier::new();
        let added = frontier.bulk_add(&outcome.links);
        if added < outcome.links.len() {
            tracing::info!(
                "{} duplicate product links dropped",
                outcome.links.len() - added
            );
        }

        let mut records = Vec::with_capacity(added);
        let total = frontier.count();
        for url in &outcome.links {
            if frontier.status(url) != Some(UrlStatus::Pending) {
                continue;
            }

            tracing::info!(
                "Scraping product {}/{}: {}",
                total - frontier.count_remaining() + 1,
                total,
                url
            );
            match self.scrape_product(url).await {
                Ok(record) => {
                    frontier.mark_visited(url);
                    records.push(record);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    frontier.mark_failed(url);
                }
            }
        }

        let stats = CrawlStatistics {
            listing_pages: outcome.pages_visited,
            links_collected: outcome.links.len(),
            unique_links: frontier.count(),
            products_extracted: frontier.count_with(UrlStatus::Visited),
            products_failed: frontier.count_with(UrlStatus::Failed),
            stop_reason: outcome.stop,
            elapsed: start_time.elapsed(),
        };
        stats.log();

        Ok(ListingReport { records, stats })
    }

    /// Loads a product URL in a fresh page and extracts it
    pub async fn scrape_product(&self, url: &str) -> Result<ProductRecord, ScoutError> {
        let page = self.session.new_page(ResourcePolicy::allow_all()).await?;

        let result = match page.goto(url, self.navigation_timeout()).await {
            Ok(()) => self.extractor.extract(&page, url).await,
            Err(e) => Err(ExtractError::Navigation(e)),
        };

        if let Err(e) = page.close().await {
            tracing::warn!("Failed to close page for {}: {} (non-fatal)", url, e);
        }

        Ok(result?)
    }

    /// Loads a product URL and returns only its image URLs
    pub async fn scrape_product_images(&self, url: &str) -> Result<Vec<String>, ScoutError> {
        let page = self.session.new_page(ResourcePolicy::allow_all()).await?;

        let result = match page.goto(url, self.navigation_timeout()).await {
            Ok(()) => {
                let page_url = page.current_url().await.unwrap_or_else(|_| url.to_string());
                Ok(self.extractor.extract_images(&page, &page_url).await)
            }
            Err(e) => Err(e),
        };

        if let Err(e) = page.close().await {
            tracing::warn!("Failed to close page for {}: {} (non-fatal)", url, e);
        }

        let images = result?;
        tracing::info!("Found {} product images on {}", images.len(), url);
        Ok(images)
    }

    /// Closes the browser session
    pub async fn shutdown(self) -> Result<(), ScoutError> {
        self.session.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::{FakeSession, FakeSite};
    use crate::crawler::PolitenessDelay;
    use crate::crawler::StopReason;

    const LISTING: &str = "https://listado.mercadolibre.com.pe/teclado";
    const LISTING_2: &str = "https://listado.mercadolibre.com.pe/teclado_Desde_3";

    fn product_html(title: Option<&str>, price: &str) -> String {
        let title = title
            .map(|t| format!(r#"<h1 class="ui-pdp-title">{t}</h1>"#))
            .unwrap_or_default();
        format!(
            r#"<html><body>{title}
            <div id="price"><div><div class="ui-pdp-price__main-container"><div class="ui-pdp-price__second-line"><span><span>
            <span class="andes-money-amount__fraction">{price}</span>
            </span></span></div></div></div></div>
            <img class="ui-pdp-gallery__figure__image" src="https://img.example/{price}.jpg">
            </body></html>"#
        )
    }

    fn listing_html(hrefs: &[&str], next: Option<&str>) -> String {
        let cards: String = hrefs
            .iter()
            .map(|href| {
                format!(r#"<div class="poly-card__content"><h3><a href="{href}">x</a></h3></div>"#)
            })
            .collect();
        let next = next
            .map(|n| format!(r#"<li class="andes-pagination__button andes-pagination__button--next"><a href="{n}">&gt;</a></li>"#))
            .unwrap_or_default();
        format!(r#"<html><body><div class="ui-search-main--only-products">{cards}</div><ul>{next}</ul></body></html>"#)
    }

    fn coordinator(site: FakeSite) -> Coordinator<FakeSession> {
        let mut config = Config::default();
        config.browser.selector_timeout_ms = 10;
        config.browser.next_page_timeout_ms = 10;
        let paginator = Paginator::from_config(&config).with_delay(PolitenessDelay::none());
        Coordinator::new(FakeSession::new(site), config).with_paginator(paginator)
    }

    fn site() -> FakeSite {
        let page_1 = listing_html(
            &[
                "https://articulo.mercadolibre.com.pe/MPE-1?pos=1",
                "https://articulo.mercadolibre.com.pe/MPE-2",
                "https://articulo.mercadolibre.com.pe/MPE-1?pos=3",
            ],
            Some(LISTING_2),
        );
        let page_2 = listing_html(
            &[
                "https://click1.mercadolibre.com.pe/ad",
                "https://articulo.mercadolibre.com.pe/MPE-3",
                "https://articulo.mercadolibre.com.pe/MPE-4",
            ],
            None,
        );
        let p1 = product_html(Some("Uno"), "100");
        let p2 = product_html(None, "200");
        let p3 = product_html(Some("Tres"), "1.300");
        let p4 = product_html(Some("Cuatro"), "400");
        FakeSite::new(&[
            (LISTING, page_1.as_str()),
            (LISTING_2, page_2.as_str()),
            ("https://articulo.mercadolibre.com.pe/MPE-1", p1.as_str()),
            ("https://articulo.mercadolibre.com.pe/MPE-2", p2.as_str()),
            ("https://articulo.mercadolibre.com.pe/MPE-3", p3.as_str()),
            ("https://articulo.mercadolibre.com.pe/MPE-4", p4.as_str()),
        ])
    }

    #[tokio::test]
    async fn test_scrape_listing_end_to_end() {
        let coordinator = coordinator(site());

        let report = coordinator.scrape_listing(LISTING, 10).await.unwrap();

        let titles: Vec<_> = report.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Uno", "Tres", "Cuatro"]);
        assert_eq!(report.records[1].price.amount_cents, 130_000);

        let stats = &report.stats;
        assert_eq!(stats.listing_pages, 2);
        assert_eq!(stats.links_collected, 5);
        assert_eq!(stats.unique_links, 4);
        assert_eq!(stats.products_extracted, 3);
        assert_eq!(stats.products_failed, 1);
        assert_eq!(stats.stop_reason, StopReason::Exhausted);
    }

    #[tokio::test]
    async fn test_scrape_listing_respects_target() {
        let coordinator = coordinator(site());

        let report = coordinator.scrape_listing(LISTING, 2).await.unwrap();

        assert_eq!(report.stats.links_collected, 2);
        assert_eq!(report.stats.listing_pages, 1);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.stats.stop_reason, StopReason::TargetReached);
    }

    #[tokio::test]
    async fn test_resource_policies() {
        let coordinator = coordinator(site());
        coordinator.scrape_listing(LISTING, 2).await.unwrap();

        let policies = coordinator.session.policies.lock().unwrap().clone();
        assert!(policies[0].blocks_anything());
        assert!(policies[1..].iter().all(|p| !p.blocks_anything()));
    }

    #[tokio::test]
    async fn test_unavailable_listing_gives_empty_report() {
        let coordinator = coordinator(site());

        let report = coordinator
            .scrape_listing("https://listado.mercadolibre.com.pe/nada", 5)
            .await
            .unwrap();

        assert!(report.records.is_empty());
        assert!(matches!(
            report.stats.stop_reason,
            StopReason::ListingUnavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_scrape_product_missing_page() {
        let coordinator = coordinator(site());
        let result = coordinator
            .scrape_product("https://articulo.mercadolibre.com.pe/MPE-404")
            .await;
        assert!(matches!(
            result,
            Err(ScoutError::Extract(ExtractError::Navigation(_)))
        ));
    }

    #[tokio::test]
    async fn test_scrape_product_images() {
        let coordinator = coordinator(site());
        let images = coordinator
            .scrape_product_images("https://articulo.mercadolibre.com.pe/MPE-4")
            .await
            .unwrap();
        assert_eq!(images, vec!["https://img.example/400.jpg".to_string()]);
        coordinator.shutdown().await.unwrap();
    }
}
