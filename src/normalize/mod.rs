//! Text normalizers
//!
//! Pure functions turning raw on-page strings into typed values. Apart from
//! the required price amount, none of them fail: unusable input becomes an
//! absent value or zero.

mod counts;
mod price;

use thiserror::Error;

pub use counts::{clean_review_count, parse_optional_f32, parse_optional_u32, parse_sold_count};
pub use price::{parse_cents, parse_price_cents, parse_whole_amount_cents};

/// Errors from the required price amount
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Not a price amount: '{0}'")]
    InvalidAmount(String),

    #[error("Price amount out of range: '{0}'")]
    Overflow(String),
}
