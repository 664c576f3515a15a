//! Selector evaluation over a static HTML document

use super::BrowserError;
use scraper::{ElementRef, Html, Selector};

fn parse_selector(selector: &str) -> Result<Selector, BrowserError> {
    Selector::parse(selector).map_err(|e| BrowserError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

fn select_with<T>(
    html: &str,
    selector: &str,
    f: impl Fn(ElementRef<'_>) -> T,
) -> Result<Vec<T>, BrowserError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    let values = document.select(&selector).map(f).collect();
    Ok(values)
}

pub(crate) fn count(html: &str, selector: &str) -> Result<usize, BrowserError> {
    Ok(select_with(html, selector, |_| ())?.len())
}

pub(crate) fn text_contents(html: &str, selector: &str) -> Result<Vec<String>, BrowserError> {
    select_with(html, selector, |el| el.text().collect::<String>())
}

pub(crate) fn attributes(
    html: &str,
    selector: &str,
    name: &str,
) -> Result<Vec<Option<String>>, BrowserError> {
    select_with(html, selector, |el| el.value().attr(name).map(str::to_string))
}
