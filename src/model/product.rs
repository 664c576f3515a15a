//! Product records produced by the page extractor

use crate::model::CurrencyCode;
use serde::Serialize;
use std::fmt;

/// A price in minor currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Price {
    /// Amount in cents (minor units), never negative
    pub amount_cents: u64,

    /// Currency the amount is quoted in
    pub currency: CurrencyCode,
}

impl Price {
    pub fn new(amount_cents: u64, currency: CurrencyCode) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Formats the amount as `<whole>.<cents>` without currency
    pub fn format_amount(&self) -> String {
        format!("{}.{:02}", self.amount_cents / 100, self.amount_cents % 100)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.currency.is_known() {
            write!(f, "{} {}", self.currency.abbrev(), self.format_amount())
        } else {
            write!(f, "{}", self.format_amount())
        }
    }
}

/// Seller information shown on a product page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreInfo {
    /// Store name, empty when the page does not show one
    pub name: String,

    /// Canonical store URL (no query or fragment), empty when missing
    pub url: String,

    /// Logo image `src`
    pub logo_url: Option<String>,

    /// Logo image lazy-load source (`data-src`)
    pub logo_url_original: Option<String>,
}

/// One product extracted from a product page
///
/// Optional fields are `None` when the page omits them; they are never
/// defaulted to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub title: String,
    pub price: Price,

    /// Canonical product URL (no query or fragment)
    pub url: String,

    pub review_count: Option<u32>,

    /// Average rating, 0.0 to 5.0 by convention
    pub rating: Option<f32>,

    /// Lower bound on units sold ("sold more than N")
    pub sold_at_least: Option<u32>,

    pub description: String,

    /// Absolute image URLs in document order
    pub image_urls: Vec<String>,

    pub store: StoreInfo,
}
