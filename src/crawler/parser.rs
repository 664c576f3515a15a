//! Product link collection from a listing page
//!
//! Link rules:
//! - hrefs are resolved against the page URL (relative links work)
//! - empty hrefs are skipped
//! - hrefs starting with a denylisted prefix (ad-click redirectors) are skipped
//! - query and fragment are stripped from every resolved URL

use crate::browser::{BrowserError, PageHandle};
use crate::url::{matches_any_prefix, resolve_link};
use url::Url;

/// Resolves and filters raw hrefs read from a page
///
/// # Arguments
///
/// * `hrefs` - Raw `href` values in document order (`None` for anchors without one)
/// * `base_url` - The page URL relative links resolve against
/// * `denylist` - Link prefixes to skip
///
/// # Returns
///
/// Absolute URLs without query or fragment, in document order
///
/// # Example
///
/// ```
/// use meli_scout::crawler::filter_product_links;
/// use url::Url;
///
/// let base = Url::parse("https://listado.example.com/teclado").unwrap();
/// let hrefs = vec![
///     Some("/MPE-1-teclado?pos=1#p".to_string()),
///     Some("https://click1.example.com/ad".to_string()),
///     None,
/// ];
/// let links = filter_product_links(&hrefs, &base, &["https://click1".to_string()]);
/// assert_eq!(links, vec!["https://listado.example.com/MPE-1-teclado".to_string()]);
/// ```
pub fn filter_product_links(
    hrefs: &[Option<String>],
    base_url: &Url,
    denylist: &[String],
) -> Vec<String> {
    let mut links = Vec::with_capacity(hrefs.len());

    for href in hrefs {
        let href = match href.as_deref().map(str::trim) {
            Some(href) if !href.is_empty() => href,
            _ => {
                tracing::trace!("Skipping anchor without href");
                continue;
            }
        };

        if matches_any_prefix(href, denylist) {
            tracing::trace!("Skipping denylisted link {}", href);
            continue;
        }

        match resolve_link(href, base_url) {
            Some(url) => {
                let url = url.to_string();
                // Relative hrefs can only be checked once resolved
                if matches_any_prefix(&url, denylist) {
                    tracing::trace!("Skipping denylisted link {}", url);
                    continue;
                }
                links.push(url);
            }
            None => tracing::debug!("Could not resolve link {}", href),
        }
    }

    links
}

/// Collects product links from the page currently loaded in `page`
pub async fn collect_page_links<P: PageHandle>(
    page: &P,
    selector: &str,
    denylist: &[String],
) -> Result<Vec<String>, BrowserError> {
    let current = page.current_url().await?;
    let base_url = Url::parse(&current).map_err(|e| BrowserError::Navigation {
        url: current.clone(),
        reason: e.to_string(),
    })?;

    let hrefs = page.attributes(selector, "href").await?;
    let links = filter_product_links(&hrefs, &base_url, denylist);

    tracing::debug!(
        "Collected {} of {} links on {}",
        links.len(),
        hrefs.len(),
        current
    );
    Ok(links)
}
