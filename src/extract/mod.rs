//! Page extractor
//!
//! Turns a loaded product page into a [`ProductRecord`]. Only the title and
//! the whole price amount are required; every other field degrades to an
//! absent value (or an empty string) with a logged diagnostic.
//!
//! Optional regions are existence-checked with a count before any wait, so
//! a page that never renders reviews costs no timeout.

use crate::browser::{BrowserError, PageHandle, WaitState};
use crate::config::{Config, SelectorConfig};
use crate::model::{Price, ProductRecord, StoreInfo};
use crate::normalize::{
    clean_review_count, parse_optional_f32, parse_optional_u32, parse_price_cents,
    parse_sold_count, NormalizeError,
};
use crate::url::{currency_for_url, normalize_url_base};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Reasons a page yields no record
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to load product page: {0}")]
    Navigation(#[from] BrowserError),

    #[error("Product title not found on {0}")]
    MissingTitle(String),

    #[error("Price amount not found on {0}")]
    MissingPrice(String),

    #[error("Invalid price on {url}: {source}")]
    InvalidPrice {
        url: String,
        #[source]
        source: NormalizeError,
    },
}

/// Review-derived fields, all absent when the page has no reviews region
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Reviews {
    review_count: Option<u32>,
    rating: Option<f32>,
    sold_at_least: Option<u32>,
}

/// Selector-driven product page extractor
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    selectors: SelectorConfig,
    selector_timeout: Duration,
}

impl ProductExtractor {
    pub fn new(selectors: SelectorConfig, selector_timeout: Duration) -> Self {
        Self {
            selectors,
            selector_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.selectors.clone(),
            config.browser.selector_timeout(),
        )
    }

    pub fn selectors(&self) -> &SelectorConfig {
        &self.selectors
    }

    /// Extracts one product record from a loaded page
    ///
    /// # Arguments
    ///
    /// * `page` - A page already showing the product
    /// * `url` - The URL the page was loaded from
    ///
    /// # Returns
    ///
    /// * `Ok(ProductRecord)` - Title and price were found
    /// * `Err(ExtractError)` - The page is not a usable product page
    pub async fn extract<P: PageHandle>(
        &self,
        page: &P,
        url: &str,
    ) -> Result<ProductRecord, ExtractError> {
        let reviews = self.extract_reviews(page).await;
        let title = self.extract_title(page, url).await?;

        let page_url = match page.current_url().await {
            Ok(current) => current,
            Err(e) => {
                tracing::debug!("Could not read current URL, using {}: {}", url, e);
                url.to_string()
            }
        };
        let currency = currency_for_url(&page_url);
        if !currency.is_known() {
            tracing::warn!("No currency known for {}", page_url);
        }

        let amount_cents = self.extract_amount_cents(page, url).await?;
        let store = self.extract_store(page).await;
        let image_urls = self.extract_images(page, &page_url).await;
        let description = self.extract_description(page).await;

        tracing::debug!(
            "Extracted '{}' ({} cents, {} images)",
            title,
            amount_cents,
            image_urls.len()
        );

        Ok(ProductRecord {
            title,
            price: Price::new(amount_cents, currency),
            url: normalize_url_base(url),
            review_count: reviews.review_count,
            rating: reviews.rating,
            sold_at_least: reviews.sold_at_least,
            description,
            image_urls,
            store,
        })
    }

    async fn extract_reviews<P: PageHandle>(&self, page: &P) -> Reviews {
        let container = &self.selectors.reviews_container;

        let present = match page.count(container).await {
            Ok(n) => n > 0,
            Err(e) => {
                tracing::warn!("Failed to probe reviews region: {}", e);
                false
            }
        };
        if !present {
            tracing::debug!("No reviews region on page");
            return Reviews::default();
        }

        if let Err(e) = page
            .wait_for(container, WaitState::Visible, self.selector_timeout)
            .await
        {
            tracing::warn!("Reviews region never became visible: {}", e);
            return Reviews::default();
        }

        let review_count = self
            .read_optional_text(page, &self.selectors.scoped_review_count())
            .await
            .and_then(|text| parse_optional_u32(&clean_review_count(&text)));

        let rating = self
            .read_optional_text(page, &self.selectors.scoped_review_rating())
            .await
            .and_then(|text| parse_optional_f32(&text));

        let sold_at_least = match page.text_contents(&self.selectors.sold_subtitle).await {
            Ok(texts) => texts.first().map(|text| parse_sold_count(text)),
            Err(e) => {
                tracing::warn!("Failed to read sold count: {}", e);
                None
            }
        };

        Reviews {
            review_count,
            rating,
            sold_at_least,
        }
    }

    async fn extract_title<P: PageHandle>(
        &self,
        page: &P,
        url: &str,
    ) -> Result<String, ExtractError> {
        let selector = &self.selectors.title;

        let count = page.count(selector).await.unwrap_or_else(|e| {
            tracing::warn!("Failed to probe title on {}: {}", url, e);
            0
        });
        if count == 0 {
            tracing::warn!("Product title not found, skipping {}", url);
            return Err(ExtractError::MissingTitle(url.to_string()));
        }

        match page.first_text(selector).await {
            Ok(Some(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Ok(_) => Err(ExtractError::MissingTitle(url.to_string())),
            Err(e) => {
                tracing::warn!("Failed to read title on {}: {}", url, e);
                Err(ExtractError::MissingTitle(url.to_string()))
            }
        }
    }

    async fn extract_amount_cents<P: PageHandle>(
        &self,
        page: &P,
        url: &str,
    ) -> Result<u64, ExtractError> {
        let whole = match page.first_text(&self.selectors.price_whole).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!("Price amount not found on {}", url);
                return Err(ExtractError::MissingPrice(url.to_string()));
            }
            Err(e) => {
                tracing::warn!("Failed to read price amount on {}: {}", url, e);
                return Err(ExtractError::MissingPrice(url.to_string()));
            }
        };

        let cents = self
            .read_optional_text(page, &self.selectors.price_cents)
            .await;
        if cents.is_none() {
            tracing::debug!("No cents element, using 0");
        }

        parse_price_cents(&whole, cents.as_deref()).map_err(|source| {
            tracing::warn!("Unparsable price '{}' on {}: {}", whole.trim(), url, source);
            ExtractError::InvalidPrice {
                url: url.to_string(),
                source,
            }
        })
    }

    async fn extract_store<P: PageHandle>(&self, page: &P) -> StoreInfo {
        let name = self
            .read_optional_text(page, &self.selectors.store_name)
            .await
            .map(|name| name.trim().to_string())
            .unwrap_or_default();

        let url = self
            .read_optional_attribute(page, &self.selectors.store_url, "href")
            .await
            .map(|href| normalize_url_base(href.trim()))
            .unwrap_or_default();

        let logo = &self.selectors.store_logo;
        let logo_url = self.read_optional_attribute(page, logo, "src").await;
        let logo_url_original = self.read_optional_attribute(page, logo, "data-src").await;

        if name.is_empty() {
            tracing::warn!("Store name not found");
        }

        StoreInfo {
            name,
            url,
            logo_url,
            logo_url_original,
        }
    }

    /// Reads the `src` of every product image in document order
    ///
    /// Images without a usable `src` are logged and skipped; relative sources
    /// are resolved against `page_url`.
    pub async fn extract_images<P: PageHandle>(&self, page: &P, page_url: &str) -> Vec<String> {
        let sources = match page.attributes(&self.selectors.images, "src").await {
            Ok(sources) => sources,
            Err(e) => {
                tracing::warn!("Failed to read product images: {}", e);
                return Vec::new();
            }
        };

        let base = Url::parse(page_url).ok();
        let mut urls = Vec::with_capacity(sources.len());
        for (index, src) in sources.into_iter().enumerate() {
            match src.as_deref().map(str::trim) {
                Some(src) if !src.is_empty() => urls.push(resolve_asset(src, base.as_ref())),
                _ => tracing::warn!("Product image #{} has no src", index + 1),
            }
        }
        urls
    }

    async fn extract_description<P: PageHandle>(&self, page: &P) -> String {
        let selector = &self.selectors.description;
        match page.count(selector).await {
            Ok(0) => String::new(),
            Ok(_) => match page.text_contents(selector).await {
                Ok(paragraphs) => paragraphs
                    .iter()
                    .map(|p| p.trim())
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n"),
                Err(e) => {
                    tracing::warn!("Failed to read description: {}", e);
                    String::new()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to probe description: {}", e);
                String::new()
            }
        }
    }

    /// Existence-checked first-match text
    async fn read_optional_text<P: PageHandle>(&self, page: &P, selector: &str) -> Option<String> {
        match page.count(selector).await {
            Ok(0) => None,
            Ok(_) => page.first_text(selector).await.unwrap_or_else(|e| {
                tracing::warn!("Failed to read '{}': {}", selector, e);
                None
            }),
            Err(e) => {
                tracing::warn!("Failed to probe '{}': {}", selector, e);
                None
            }
        }
    }

    /// Existence-checked first-match attribute; empty values count as absent
    async fn read_optional_attribute<P: PageHandle>(
        &self,
        page: &P,
        selector: &str,
        name: &str,
    ) -> Option<String> {
        match page.count(selector).await {
            Ok(0) => None,
            Ok(_) => match page.first_attribute(selector, name).await {
                Ok(value) => value.filter(|v| !v.trim().is_empty()),
                Err(e) => {
                    tracing::warn!("Failed to read {} of '{}': {}", name, selector, e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to probe '{}': {}", selector, e);
                None
            }
        }
    }
}

fn resolve_asset(src: &str, base: Option<&Url>) -> String {
    match base.and_then(|base| base.join(src).ok()) {
        Some(resolved) => resolved.to_string(),
        None => src.to_string(),
    }
}
