//! Data model for scraped products
//!
//! - `ProductRecord`, `Price`, `StoreInfo`: the typed output of one product page
//! - `CurrencyCode`, `Country`: the closed currency and marketplace tables

mod currency;
mod product;

pub use currency::{Country, CurrencyCode};
pub use product::{Price, ProductRecord, StoreInfo};
