//! Chromium engine over the DevTools protocol
//!
//! Element queries run as small JavaScript snippets evaluated in the page,
//! with selectors JSON-quoted so arbitrary CSS survives the round trip.
//! Resource blocking uses the Fetch domain: every paused request is either
//! failed with `BlockedByClient` or continued, by resource type.
//!
//! `chromiumoxide` pages and browsers need an explicit async close. Both
//! wrappers close explicitly on the happy path and spawn the close from
//! `Drop` when an early return skips it.

use super::{BrowserError, BrowserSession, PageHandle, ResourcePolicy, WaitState};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams as FetchEnableParams, EventRequestPaused,
    FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    ErrorReason, ResourceType, SetUserAgentOverrideParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::task::JoinHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn protocol_error(e: impl std::fmt::Display) -> BrowserError {
    BrowserError::Protocol(e.to_string())
}

fn quote(selector: &str) -> String {
    serde_json::Value::String(selector.to_string()).to_string()
}

fn count_script(selector: &str) -> String {
    format!("document.querySelectorAll({}).length", quote(selector))
}

fn texts_script(selector: &str) -> String {
    format!(
        "Array.from(document.querySelectorAll({})).map(e => e.textContent || '')",
        quote(selector)
    )
}

fn attributes_script(selector: &str, name: &str) -> String {
    format!(
        "Array.from(document.querySelectorAll({})).map(e => e.getAttribute({}))",
        quote(selector),
        quote(name)
    )
}

fn visible_script(selector: &str) -> String {
    format!(
        "(() => {{ const e = document.querySelector({}); if (!e) return false; \
         const s = window.getComputedStyle(e); const r = e.getBoundingClientRect(); \
         return s.visibility !== 'hidden' && s.display !== 'none' && (r.width > 0 || r.height > 0); }})()",
        quote(selector)
    )
}

fn is_blocked(policy: &ResourcePolicy, resource: &ResourceType) -> bool {
    match resource {
        ResourceType::Image => policy.block_images,
        ResourceType::Media => policy.block_media,
        ResourceType::Font => policy.block_fonts,
        _ => false,
    }
}

/// A launched Chromium instance
pub struct ChromeSession {
    browser: Option<Browser>,
    handler_task: Option<JoinHandle<usize>>,
    user_agent: String,
}

impl ChromeSession {
    /// Launches Chromium and starts the DevTools event loop
    ///
    /// # Arguments
    ///
    /// * `config` - Browser configuration (headless mode, sandbox, timeouts, user agent)
    ///
    /// # Returns
    ///
    /// * `Ok(ChromeSession)` - Browser is running
    /// * `Err(BrowserError::Launch)` - Chromium could not be started
    pub async fn launch(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let mut builder = LaunchConfig::builder()
            .request_timeout(config.navigation_timeout())
            .launch_timeout(config.launch_timeout());

        if !config.headless {
            builder = builder.with_head();
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }

        let launch_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(launch_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(drive_handler(handler));

        tracing::info!(
            "Chromium launched ({})",
            if config.headless { "headless" } else { "headed" }
        );

        Ok(Self {
            browser: Some(browser),
            handler_task: Some(handler_task),
            user_agent: config.user_agent.clone(),
        })
    }

    fn browser(&self) -> Result<&Browser, BrowserError> {
        self.browser
            .as_ref()
            .ok_or_else(|| BrowserError::Protocol("browser already closed".to_string()))
    }
}

/// Drives the DevTools event stream until the connection closes
///
/// Individual errors (messages that fail to deserialize, for one) are logged
/// and skipped; every pending command depends on this loop staying alive.
async fn drive_handler<S, E>(mut handler: S) -> usize
where
    S: futures::Stream<Item = Result<(), E>> + Unpin,
    E: std::fmt::Display,
{
    let mut errors = 0;
    while let Some(event) = handler.next().await {
        if let Err(e) = event {
            errors += 1;
            tracing::debug!("Browser event error (continuing): {}", e);
        }
    }
    tracing::debug!("Browser event loop ended after {} errors", errors);
    errors
}

/// Installs Fetch-domain interception that drops the blocked resource types
async fn install_resource_policy(
    page: &Page,
    policy: ResourcePolicy,
) -> Result<JoinHandle<()>, BrowserError> {
    let mut paused = page
        .event_listener::<EventRequestPaused>()
        .await
        .map_err(protocol_error)?;
    page.execute(FetchEnableParams::default())
        .await
        .map_err(protocol_error)?;

    let page = page.clone();
    Ok(tokio::spawn(async move {
        while let Some(event) = paused.next().await {
            let outcome = if is_blocked(&policy, &event.resource_type) {
                tracing::trace!("Blocked {:?} {}", event.resource_type, event.request.url);
                page.execute(FailRequestParams::new(
                    event.request_id.clone(),
                    ErrorReason::BlockedByClient,
                ))
                .await
                .map(|_| ())
            } else {
                page.execute(ContinueRequestParams::new(event.request_id.clone()))
                    .await
                    .map(|_| ())
            };
            if let Err(e) = outcome {
                tracing::debug!("Request interception ended: {}", e);
                break;
            }
        }
    }))
}

#[async_trait]
impl BrowserSession for ChromeSession {
    type Page = ChromePage;

    async fn new_page(&self, policy: ResourcePolicy) -> Result<ChromePage, BrowserError> {
        let page = self
            .browser()?
            .new_page("about:blank")
            .await
            .map_err(protocol_error)?;

        let mut guard = ChromePage {
            page: Some(page),
            interceptor: None,
        };
        let page = guard.page()?;

        page.set_user_agent(SetUserAgentOverrideParams::new(self.user_agent.clone()))
            .await
            .map_err(protocol_error)?;

        if policy.blocks_anything() {
            let interceptor = install_resource_policy(page, policy).await?;
            guard.interceptor = Some(interceptor);
        }

        Ok(guard)
    }

    async fn close(mut self) -> Result<(), BrowserError> {
        if let Some(mut browser) = self.browser.take() {
            browser.close().await.map_err(protocol_error)?;
            if let Err(e) = browser.wait().await {
                tracing::debug!("Waiting for browser exit failed: {}", e);
            }
            tracing::info!("Chromium closed");
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Some(mut browser) = self.browser.take() {
            let handler_task = self.handler_task.take();
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                runtime.spawn(async move {
                    if let Err(e) = browser.close().await {
                        tracing::warn!("Browser drop cleanup failed: {}", e);
                    }
                    let _ = browser.wait().await;
                    if let Some(task) = handler_task {
                        task.abort();
                    }
                });
            }
        }
    }
}

/// A Chromium tab
pub struct ChromePage {
    page: Option<Page>,
    interceptor: Option<JoinHandle<()>>,
}

impl ChromePage {
    fn page(&self) -> Result<&Page, BrowserError> {
        self.page
            .as_ref()
            .ok_or_else(|| BrowserError::Protocol("page already closed".to_string()))
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, BrowserError> {
        self.page()?
            .evaluate(script)
            .await
            .map_err(protocol_error)?
            .into_value::<T>()
            .map_err(protocol_error)
    }

    async fn is_visible(&self, selector: &str) -> Result<bool, BrowserError> {
        self.eval(visible_script(selector)).await
    }
}

#[async_trait]
impl PageHandle for ChromePage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        tracing::debug!("Navigating to {}", url);
        let page = self.page()?;
        match tokio::time::timeout(timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BrowserError::timeout(format!("navigation to {}", url), timeout)),
        }
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        self.page()?
            .url()
            .await
            .map_err(protocol_error)?
            .ok_or(BrowserError::NotLoaded)
    }

    async fn count(&self, selector: &str) -> Result<usize, BrowserError> {
        self.eval(count_script(selector)).await
    }

    async fn wait_for(
        &self,
        selector: &str,
        state: WaitState,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let poll = async {
            loop {
                let ready = match state {
                    WaitState::Attached => self.count(selector).await? > 0,
                    WaitState::Visible => self.is_visible(selector).await?,
                };
                if ready {
                    return Ok::<(), BrowserError>(());
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(BrowserError::timeout(selector, timeout)),
        }
    }

    async fn text_contents(&self, selector: &str) -> Result<Vec<String>, BrowserError> {
        self.eval(texts_script(selector)).await
    }

    async fn attributes(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Vec<Option<String>>, BrowserError> {
        self.eval(attributes_script(selector, name)).await
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        let page = self.page()?;
        let element = page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::ElementNotFound(selector.to_string()))?;
        element.click().await.map_err(protocol_error)?;

        match tokio::time::timeout(timeout, page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(protocol_error(e)),
            Err(_) => Err(BrowserError::timeout(
                format!("navigation after clicking {}", selector),
                timeout,
            )),
        }
    }

    async fn close(mut self) -> Result<(), BrowserError> {
        if let Some(task) = self.interceptor.take() {
            task.abort();
        }
        if let Some(page) = self.page.take() {
            page.close().await.map_err(protocol_error)?;
        }
        Ok(())
    }
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        if let Some(task) = self.interceptor.take() {
            task.abort();
        }
        if let Some(page) = self.page.take() {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                runtime.spawn(async move {
                    if let Err(e) = page.close().await {
                        tracing::warn!("Page drop cleanup failed: {}", e);
                    }
                });
            }
        }
    }
}
