use url::Url;

/// Reduces a URL to `scheme://host/path`
///
/// Query string and fragment are dropped. Strings that are not absolute
/// hierarchical URLs (relative paths, `mailto:` and friends, garbage) are
/// returned unchanged. Applying the function twice gives the same result as
/// applying it once.
///
/// # Examples
///
/// ```
/// use meli_scout::url::normalize_url_base;
///
/// assert_eq!(
///     normalize_url_base("https://tienda.example.com/store?ref=pdp#top"),
///     "https://tienda.example.com/store"
/// );
/// assert_eq!(normalize_url_base("/relative/path?x=1"), "/relative/path?x=1");
/// ```
pub fn normalize_url_base(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    let url = match Url::parse(s) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Not an absolute URL '{}': {}", s, e);
            return s.to_string();
        }
    };

    if url.cannot_be_a_base() {
        return s.to_string();
    }

    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    format!("{}://{}{}", url.scheme(), host, url.path())
}

/// Prepends `https://` to input typed without a scheme
///
/// `listado.mercadolibre.com.pe/teclado` cannot be fetched as is; anything
/// already containing `://` and empty input are returned trimmed.
///
/// # Examples
///
/// ```
/// use meli_scout::url::with_default_scheme;
///
/// assert_eq!(
///     with_default_scheme("listado.mercadolibre.com.pe/teclado"),
///     "https://listado.mercadolibre.com.pe/teclado"
/// );
/// assert_eq!(with_default_scheme("http://127.0.0.1:80/x"), "http://127.0.0.1:80/x");
/// ```
pub fn with_default_scheme(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() || s.contains("://") {
        s.to_string()
    } else {
        format!("https://{}", s)
    }
}

/// Removes query string and fragment from a parsed URL in place
pub fn strip_query_and_fragment(url: &mut Url) {
    url.set_query(None);
    url.set_fragment(None);
}

/// Resolves an href against the page it was found on
///
/// Returns the absolute URL without query or fragment, or None when the href
/// is empty or cannot be resolved.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match base_url.join(href) {
        Ok(mut absolute) => {
            strip_query_and_fragment(&mut absolute);
            Some(absolute)
        }
        Err(e) => {
            tracing::debug!("Skipping unresolvable href '{}': {}", href, e);
            None
        }
    }
}
