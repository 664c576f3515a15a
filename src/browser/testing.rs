//! In-memory site for unit tests of the crawler and the extractor

use super::{document, BrowserError, BrowserSession, PageHandle, ResourcePolicy, WaitState};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// URL to HTML map shared by every page of a [`FakeSession`]
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeSite {
    pages: Arc<HashMap<String, String>>,
}

impl FakeSite {
    pub(crate) fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            ),
        }
    }

    /// A page already showing `url`
    pub(crate) async fn open(&self, url: &str) -> FakePage {
        let page = FakePage::new(self.clone());
        page.goto(url, Duration::from_millis(10)).await.unwrap();
        page
    }
}

pub(crate) struct FakePage {
    site: FakeSite,
    current: Mutex<Option<String>>,
    pub(crate) visits: Arc<Mutex<Vec<String>>>,
}

impl FakePage {
    pub(crate) fn new(site: FakeSite) -> Self {
        Self {
            site,
            current: Mutex::new(None),
            visits: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn html(&self) -> Result<(String, String), BrowserError> {
        let current = self.current.lock().unwrap().clone();
        let url = current.ok_or(BrowserError::NotLoaded)?;
        let html = self.site.pages.get(&url).cloned().unwrap_or_default();
        Ok((url, html))
    }
}

#[async_trait]
impl PageHandle for FakePage {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<(), BrowserError> {
        if !self.site.pages.contains_key(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: "HTTP 404".to_string(),
            });
        }
        self.visits.lock().unwrap().push(url.to_string());
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        Ok(self.html()?.0)
    }

    async fn count(&self, selector: &str) -> Result<usize, BrowserError> {
        document::count(&self.html()?.1, selector)
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
        document::text_contents(&self.html()?.1, selector)
    }

    async fn attributes(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Vec<Option<String>>, BrowserError> {
        document::attributes(&self.html()?.1, selector, name)
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        let (url, html) = self.html()?;
        let href = document::attributes(&html, selector, "href")?
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| BrowserError::ElementNotFound(selector.to_string()))?;
        let target = Url::parse(&url)
            .and_then(|base| base.join(&href))
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        self.goto(target.as_str(), timeout).await
    }

    async fn close(self) -> Result<(), BrowserError> {
        Ok(())
    }
}

/// Session handing out [`FakePage`]s; records every opened page's visits
#[derive(Default)]
pub(crate) struct FakeSession {
    pub(crate) site: FakeSite,
    pub(crate) policies: Mutex<Vec<ResourcePolicy>>,
}

impl FakeSession {
    pub(crate) fn new(site: FakeSite) -> Self {
        Self {
            site,
            policies: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Page = FakePage;

    async fn new_page(&self, policy: ResourcePolicy) -> Result<FakePage, BrowserError> {
        self.policies.lock().unwrap().push(policy);
        Ok(FakePage::new(self.site.clone()))
    }

    async fn close(self) -> Result<(), BrowserError> {
        Ok(())
    }
}
