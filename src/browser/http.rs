//! Static HTML engine
//!
//! Fetches pages with `reqwest` and evaluates selectors with `scraper`.
//! Nothing executes scripts, so a document never changes after it loads:
//! waits resolve at once when the element exists and time out at once when
//! it does not. Resource policies are accepted and ignored because
//! subresources are never fetched.

use super::{document, BrowserError, BrowserSession, PageHandle, ResourcePolicy, WaitState};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used by every page of a session
///
/// # Arguments
///
/// * `config` - Browser configuration (user agent and connect timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &BrowserConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.launch_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Session of the static HTML engine
pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    pub fn new(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let client =
            build_http_client(config).map_err(|e| BrowserError::Launch(e.to_string()))?;
        tracing::debug!("HTTP engine ready");
        Ok(Self { client })
    }
}

#[async_trait]
impl BrowserSession for HttpSession {
    type Page = HttpPage;

    async fn new_page(&self, _policy: ResourcePolicy) -> Result<HttpPage, BrowserError> {
        Ok(HttpPage {
            client: self.client.clone(),
            loaded: Mutex::new(None),
        })
    }

    async fn close(self) -> Result<(), BrowserError> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct LoadedDocument {
    url: Url,
    body: String,
}

/// Page of the static HTML engine
pub struct HttpPage {
    client: Client,
    loaded: Mutex<Option<LoadedDocument>>,
}

impl HttpPage {
    fn with_document<T>(
        &self,
        f: impl FnOnce(&LoadedDocument) -> Result<T, BrowserError>,
    ) -> Result<T, BrowserError> {
        let guard = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(doc) => f(doc),
            None => Err(BrowserError::NotLoaded),
        }
    }

    async fn fetch(&self, url: &str, timeout: Duration) -> Result<LoadedDocument, BrowserError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrowserError::timeout(format!("navigation to {}", url), timeout)
                } else {
                    BrowserError::Navigation {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;
        Ok(LoadedDocument {
            url: final_url,
            body,
        })
    }
}

#[async_trait]
impl PageHandle for HttpPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        tracing::debug!("GET {}", url);
        let doc = self.fetch(url, timeout).await?;
        *self.loaded.lock().unwrap_or_else(PoisonError::into_inner) = Some(doc);
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        self.with_document(|doc| Ok(doc.url.to_string()))
    }

    async fn count(&self, selector: &str) -> Result<usize, BrowserError> {
        self.with_document(|doc| document::count(&doc.body, selector))
    }

    async fn wait_for(
        &self,
        selector: &str,
        _state: WaitState,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        if self.count(selector).await? > 0 {
            Ok(())
        } else {
            Err(BrowserError::timeout(selector, timeout))
        }
    }

    async fn text_contents(&self, selector: &str) -> Result<Vec<String>, BrowserError> {
        self.with_document(|doc| document::text_contents(&doc.body, selector))
    }

    async fn attributes(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Vec<Option<String>>, BrowserError> {
        self.with_document(|doc| document::attributes(&doc.body, selector, name))
    }

    /// Follows the `href` of the first matching element
    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        let target = self.with_document(|doc| {
            let href = document::attributes(&doc.body, selector, "href")?
                .into_iter()
                .next()
                .ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()))?
                .ok_or_else(|| BrowserError::ElementNotFound(format!("{}[href]", selector)))?;
            doc.url
                .join(href.trim())
                .map_err(|e| BrowserError::Navigation {
                    url: href.clone(),
                    reason: e.to_string(),
                })
        })?;

        self.goto(target.as_str(), timeout).await
    }

    async fn close(self) -> Result<(), BrowserError> {
        Ok(())
    }
}
