//! Currencies and marketplace countries
//!
//! The marketplace runs one site per country. The country is recovered from
//! the site's domain suffix and determines the currency prices are quoted in.

use serde::Serialize;
use std::fmt;

/// Currencies a product price can be quoted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CurrencyCode {
    #[serde(rename = "PEN")]
    Pen,
    #[serde(rename = "MXN")]
    Mxn,
    #[serde(rename = "COP")]
    Cop,
    #[serde(rename = "ARS")]
    Ars,
    #[serde(rename = "CLP")]
    Clp,
    #[serde(rename = "BOB")]
    Bob,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "CNY")]
    Cny,
    /// Sentinel for sites and symbols outside the known table
    #[serde(rename = "")]
    Unknown,
}

impl CurrencyCode {
    /// ISO 4217 code, empty for `Unknown`
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pen => "PEN",
            Self::Mxn => "MXN",
            Self::Cop => "COP",
            Self::Ars => "ARS",
            Self::Clp => "CLP",
            Self::Bob => "BOB",
            Self::Usd => "USD",
            Self::Cny => "CNY",
            Self::Unknown => "",
        }
    }

    /// Display abbreviation as rendered next to prices on the site
    pub fn abbrev(&self) -> &'static str {
        match self {
            Self::Pen => "S/",
            Self::Mxn => "Mex$",
            Self::Cop => "COP$",
            Self::Ars => "AR$",
            Self::Clp => "CLP$",
            Self::Bob => "Bs",
            Self::Usd => "US$",
            Self::Cny => "CN¥",
            Self::Unknown => "",
        }
    }

    /// Maps an ISO code back to a currency; unknown codes yield `Unknown`
    pub fn from_code(code: &str) -> Self {
        Self::known()
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
            .unwrap_or(Self::Unknown)
    }

    /// Maps an on-page abbreviation to a currency; unknown symbols yield `Unknown`
    pub fn from_abbrev(abbrev: &str) -> Self {
        let abbrev = abbrev.trim();
        Self::known()
            .into_iter()
            .find(|c| c.abbrev() == abbrev)
            .unwrap_or(Self::Unknown)
    }

    /// Returns true for every member except the `Unknown` sentinel
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// All known currencies
    pub fn known() -> [Self; 8] {
        [
            Self::Pen,
            Self::Mxn,
            Self::Cop,
            Self::Ars,
            Self::Clp,
            Self::Bob,
            Self::Usd,
            Self::Cny,
        ]
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Countries with a supported marketplace site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Country {
    Argentina,
    Bolivia,
    Chile,
    Colombia,
    Mexico,
    Peru,
}

impl Country {
    /// Maps a domain suffix such as `com.pe` or `cl` to its country
    pub fn from_domain_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "com.ar" => Some(Self::Argentina),
            "com.bo" => Some(Self::Bolivia),
            "cl" => Some(Self::Chile),
            "com.co" => Some(Self::Colombia),
            "com.mx" => Some(Self::Mexico),
            "com.pe" => Some(Self::Peru),
            _ => None,
        }
    }

    /// Local currency of the country's marketplace
    pub fn currency(&self) -> CurrencyCode {
        match self {
            Self::Argentina => CurrencyCode::Ars,
            Self::Bolivia => CurrencyCode::Bob,
            Self::Chile => CurrencyCode::Clp,
            Self::Colombia => CurrencyCode::Cop,
            Self::Mexico => CurrencyCode::Mxn,
            Self::Peru => CurrencyCode::Pen,
        }
    }
}
