//! Rendering capability for the JavaScript-built dashboard.
//!
//! Browser automation itself lives outside this crate: [`RenderServiceClient`]
//! asks a headless-browser service for the final HTML, and
//! [`HtmlFileRenderer`] replays a saved snapshot.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use fecheck_core::{AppConfig, RenderReadiness};
use reqwest::{Client, Url};
use tokio::time::Instant;

use crate::error::RenderError;
use crate::page::RenderedPage;

/// In-browser wait per render while polling for labels.
const POLL_RENDER_WAIT: Duration = Duration::from_secs(2);

/// Turns a URL into rendered page content.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RenderError`] when no page content could be obtained.
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError>;
}

/// When a rendered page is considered ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Let the browser wait this long, then take whatever is there.
    FixedDelay(Duration),
    /// Re-render until every label is present or `timeout` elapses; the last
    /// page is returned either way.
    UntilText {
        labels: Vec<String>,
        timeout: Duration,
    },
}

impl Readiness {
    #[must_use]
    pub fn from_config(config: &AppConfig, labels: &[String]) -> Self {
        match config.render_readiness {
            RenderReadiness::FixedDelay => {
                Readiness::FixedDelay(Duration::from_secs(config.render_wait_secs))
            }
            RenderReadiness::PollUntilText => Readiness::UntilText {
                labels: labels.to_vec(),
                timeout: Duration::from_secs(config.render_timeout_secs),
            },
        }
    }
}

/// Client for a browserless-style `/content` endpoint.
pub struct RenderServiceClient {
    client: Client,
    endpoint: Url,
    readiness: Readiness,
}

impl RenderServiceClient {
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidUrl`] if `service_url` does not parse, or
    /// [`RenderError::Http`] if the HTTP client cannot be built.
    pub fn new(
        service_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        readiness: Readiness,
    ) -> Result<Self, RenderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", service_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join("content"))
            .map_err(|e| RenderError::InvalidUrl {
                url: service_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint,
            readiness,
        })
    }

    async fn render_once(&self, url: &str, wait: Duration) -> Result<RenderedPage, RenderError> {
        let wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&serde_json::json!({ "url": url, "waitForTimeout": wait_ms }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }
        let html = response.text().await?;
        Ok(RenderedPage::from_html(html))
    }
}

#[async_trait]
impl PageRenderer for RenderServiceClient {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        match &self.readiness {
            Readiness::FixedDelay(wait) => {
                tracing::debug!(wait_secs = wait.as_secs(), "rendering with fixed delay");
                self.render_once(url, *wait).await
            }
            Readiness::UntilText { labels, timeout } => {
                let deadline = Instant::now() + *timeout;
                let mut attempt = 0u32;
                loop {
                    attempt += 1;
                    let page = self.render_once(url, POLL_RENDER_WAIT).await?;
                    if page.contains_all(labels) {
                        tracing::debug!(attempt, "dashboard labels present");
                        return Ok(page);
                    }
                    if Instant::now() >= deadline {
                        tracing::warn!(attempt, "dashboard labels still missing at timeout");
                        return Ok(page);
                    }
                    tracing::debug!(attempt, "dashboard labels missing, re-rendering");
                }
            }
        }
    }
}

/// Serves a saved HTML snapshot regardless of the requested URL.
#[derive(Debug, Clone)]
pub struct HtmlFileRenderer {
    path: PathBuf,
}

impl HtmlFileRenderer {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageRenderer for HtmlFileRenderer {
    async fn render(&self, _url: &str) -> Result<RenderedPage, RenderError> {
        let html = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| RenderError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(RenderedPage::from_html(html))
    }
}
