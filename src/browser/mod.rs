//! Browser capability used by the crawler and the extractor
//!
//! The scraping pipeline only needs a handful of page operations:
//! - navigate to a URL with a timeout
//! - count, read text and read attributes of CSS-selected elements
//! - wait for an element to attach or become visible
//! - click a control
//!
//! Two engines implement them: [`ChromeSession`] drives headless Chromium over
//! the DevTools protocol, and [`HttpSession`] evaluates selectors against
//! server-rendered HTML fetched with a plain HTTP client.

mod chrome;
mod document;
mod http;

#[cfg(test)]
pub(crate) mod testing;

pub use chrome::{ChromePage, ChromeSession};
pub use http::{HttpPage, HttpSession};

use crate::config::BrowserConfig;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a browser engine
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    #[error("No element matches '{0}'")]
    ElementNotFound(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("No document loaded")]
    NotLoaded,

    #[error("Browser protocol error: {0}")]
    Protocol(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl BrowserError {
    pub(crate) fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        BrowserError::Timeout {
            what: what.into(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Whether the error is an expected timeout rather than a broken page
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::Timeout { .. })
    }
}

/// Element state a wait resolves on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// Present in the DOM
    Attached,
    /// Present and rendered with a non-empty box
    Visible,
}

/// Which subresource types a page refuses to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourcePolicy {
    pub block_images: bool,
    pub block_media: bool,
    pub block_fonts: bool,
}

impl ResourcePolicy {
    /// Loads everything (product pages need their images)
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Blocking policy for listing pages, taken from the browser configuration
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            block_images: config.block_images,
            block_media: config.block_media,
            block_fonts: config.block_fonts,
        }
    }

    pub fn blocks_anything(&self) -> bool {
        self.block_images || self.block_media || self.block_fonts
    }
}

/// A single loaded page
///
/// All selector reads return matches in document order. A selector that
/// matches nothing is not an error: `count` returns 0 and the list readers
/// return empty vectors.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigates to `url`, failing if the load does not finish within `timeout`
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// URL of the currently loaded document
    async fn current_url(&self) -> Result<String, BrowserError>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> Result<usize, BrowserError>;

    /// Waits until the first element matching `selector` reaches `state`
    async fn wait_for(
        &self,
        selector: &str,
        state: WaitState,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Text content of every matching element
    async fn text_contents(&self, selector: &str) -> Result<Vec<String>, BrowserError>;

    /// Value of attribute `name` on every matching element
    async fn attributes(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Vec<Option<String>>, BrowserError>;

    /// Clicks the first matching element and waits for the resulting load
    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Releases the page
    async fn close(self) -> Result<(), BrowserError>
    where
        Self: Sized;

    /// Text content of the first matching element, if any
    async fn first_text(&self, selector: &str) -> Result<Option<String>, BrowserError> {
        Ok(self.text_contents(selector).await?.into_iter().next())
    }

    /// Attribute `name` of the first matching element, if both exist
    async fn first_attribute(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        Ok(self.attributes(selector, name).await?.into_iter().next().flatten())
    }
}

/// A running browser that hands out pages
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Page: PageHandle;

    /// Opens a fresh page with the given subresource policy
    async fn new_page(&self, policy: ResourcePolicy) -> Result<Self::Page, BrowserError>;

    /// Shuts the browser down
    async fn close(self) -> Result<(), BrowserError>
    where
        Self: Sized;
}
