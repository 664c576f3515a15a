use crate::model::{Country, CurrencyCode};
use url::Url;

/// Extracts the lowercase host from a URL
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the country-identifying suffix of a marketplace host
///
/// Most sites live under `com.<cc>` (`com.pe`, `com.mx`); Chile uses the bare
/// `cl` TLD.
pub fn domain_suffix(host: &str) -> Option<String> {
    let parts: Vec<&str> = host.split('.').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [.., "cl"] => Some("cl".to_string()),
        [.., second_last, last] => Some(format!("{}.{}", second_last, last)),
        _ => None,
    }
}

/// Maps a marketplace URL to its country
pub fn country_for_url(url: &str) -> Option<Country> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Failed to parse URL '{}' for country lookup: {}", url, e);
            return None;
        }
    };

    extract_domain(&parsed)
        .and_then(|host| domain_suffix(&host))
        .and_then(|suffix| Country::from_domain_suffix(&suffix))
}

/// Maps a marketplace URL to the currency its prices are quoted in
///
/// Unmapped domains yield `CurrencyCode::Unknown`.
pub fn currency_for_url(url: &str) -> CurrencyCode {
    country_for_url(url)
        .map(|country| country.currency())
        .unwrap_or(CurrencyCode::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain_lowercase() {
        let url = Url::parse("https://ARTICULO.Example.COM/x").unwrap();
        assert_eq!(extract_domain(&url), Some("articulo.example.com".to_string()));
    }

    #[test]
    fn test_domain_suffix() {
        assert_eq!(domain_suffix("listado.mercadolibre.com.pe"), Some("com.pe".to_string()));
        assert_eq!(domain_suffix("articulo.mercadolibre.com.mx"), Some("com.mx".to_string()));
        assert_eq!(domain_suffix("www.mercadolibre.cl"), Some("cl".to_string()));
        assert_eq!(domain_suffix("localhost"), None);
        assert_eq!(domain_suffix(""), None);
    }

    #[test]
    fn test_currency_for_url() {
        assert_eq!(
            currency_for_url("https://articulo.mercadolibre.com.pe/MPE-1"),
            CurrencyCode::Pen
        );
        assert_eq!(
            currency_for_url("https://articulo.mercadolibre.com.mx/MLM-1"),
            CurrencyCode::Mxn
        );
        assert_eq!(
            currency_for_url("https://articulo.mercadolibre.com.co/MCO-1"),
            CurrencyCode::Cop
        );
        assert_eq!(
            currency_for_url("https://www.mercadolibre.cl/item"),
            CurrencyCode::Clp
        );
    }

    #[test]
    fn test_unmapped_currency() {
        assert_eq!(
            currency_for_url("https://www.mercadolivre.com.br/item"),
            CurrencyCode::Unknown
        );
        assert_eq!(currency_for_url("http://127.0.0.1:9000/p"), CurrencyCode::Unknown);
        assert_eq!(currency_for_url("not a url"), CurrencyCode::Unknown);
    }
}
