//! URL handling module for Meli-Scout
//!
//! This module provides URL base normalization, link resolution, domain to
//! currency lookup, prefix matching and URL kind classification.

mod domain;
mod matcher;
mod normalize;

use crate::config::CrawlConfig;

// Re-export main functions
pub use domain::{country_for_url, currency_for_url, domain_suffix, extract_domain};
pub use matcher::matches_any_prefix;
pub use normalize::{
    normalize_url_base, resolve_link, strip_query_and_fragment, with_default_scheme,
};

/// The kind of page a user-supplied URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlKind {
    /// A single product detail page
    Product,
    /// A search or category results page
    Listing,
    /// Anything else; nothing will be crawled
    Unrecognized,
}

impl UrlKind {
    /// Returns true if the URL can be crawled
    pub fn is_crawlable(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

/// Classifies a URL by prefix against the configured host patterns
///
/// Product prefixes are checked before listing prefixes. Empty input is
/// `Unrecognized`.
///
/// # Examples
///
/// ```
/// use meli_scout::config::CrawlConfig;
/// use meli_scout::url::{classify_url, UrlKind};
///
/// let crawl = CrawlConfig::default();
/// assert_eq!(
///     classify_url("https://listado.mercadolibre.com.pe/teclado", &crawl),
///     UrlKind::Listing
/// );
/// assert_eq!(classify_url("https://example.org/", &crawl), UrlKind::Unrecognized);
/// ```
pub fn classify_url(url: &str, config: &CrawlConfig) -> UrlKind {
    let url = url.trim();
    if url.is_empty() {
        return UrlKind::Unrecognized;
    }

    if matches_any_prefix(url, &config.product_url_prefixes) {
        return UrlKind::Product;
    }

    if matches_any_prefix(url, &config.listing_url_prefixes) {
        return UrlKind::Listing;
    }

    UrlKind::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_product() {
        let config = CrawlConfig::default();
        assert_eq!(
            classify_url(
                "https://articulo.mercadolibre.com.mx/MLM-1411526559-silla-gamer-_JM",
                &config
            ),
            UrlKind::Product
        );
        assert_eq!(
            classify_url("https://www.mercadolibre.com.pe/p/MPE123", &config),
            UrlKind::Product
        );
    }

    #[test]
    fn test_classify_listing() {
        let config = CrawlConfig::default();
        assert_eq!(
            classify_url("https://listado.mercadolibre.com.pe/teclado-mecanico", &config),
            UrlKind::Listing
        );
        assert_eq!(
            classify_url(
                &with_default_scheme("listado.mercadolibre.com.mx/carburador-stihl"),
                &config
            ),
            UrlKind::Listing
        );
    }

    #[test]
    fn test_schemeless_input_is_unrecognized_until_defaulted() {
        let config = CrawlConfig::default();
        assert_eq!(
            classify_url("listado.mercadolibre.com.pe/teclado", &config),
            UrlKind::Unrecognized
        );
        assert_eq!(
            classify_url("mercadolibre.com.pe/p/MPE123", &config),
            UrlKind::Unrecognized
        );
        assert_eq!(
            classify_url(&with_default_scheme("mercadolibre.com.pe/p/MPE123"), &config),
            UrlKind::Product
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        let config = CrawlConfig::default();
        assert_eq!(classify_url("", &config), UrlKind::Unrecognized);
        assert_eq!(classify_url("   ", &config), UrlKind::Unrecognized);
        assert_eq!(classify_url("https://example.com/", &config), UrlKind::Unrecognized);
    }

    #[test]
    fn test_custom_prefixes() {
        let mut config = CrawlConfig::default();
        config.listing_url_prefixes = vec!["http://127.0.0.1".to_string()];
        assert_eq!(
            classify_url("http://127.0.0.1:4000/search", &config),
            UrlKind::Listing
        );
    }

    #[test]
    fn test_is_crawlable() {
        assert!(UrlKind::Product.is_crawlable());
        assert!(UrlKind::Listing.is_crawlable());
        assert!(!UrlKind::Unrecognized.is_crawlable());
    }
}
