//! Turning a URL into rendered markup.
//!
//! [`PageRenderer`] is the seam between the scraping logic and whatever
//! produces the final HTML of a page. [`BrowserRenderer`] drives a headless
//! Chromium so client-side scripts run before the markup is captured;
//! [`HttpRenderer`] is a plain HTTP fetch for pages that do not need that.

mod browser;
mod http;

use std::future::Future;
use std::time::Duration;

use rand::seq::SliceRandom;

pub use browser::{BrowserOptions, BrowserRenderer};
pub use http::HttpRenderer;

use crate::config::{Config, RenderBackend};
use crate::error::{HltvError, Result};

/// Something that can render a page to its final markup.
pub trait PageRenderer: Send + Sync {
    /// Render `url` and return the serialized document.
    ///
    /// Fails with [`HltvError::RenderTimeout`] if the page is not ready within
    /// `timeout`, or with a navigation/HTTP error if the page cannot be loaded.
    fn render(&self, url: &str, timeout: Duration) -> impl Future<Output = Result<String>> + Send;
}

/// The renderer selected in the configuration.
pub enum Renderer {
    Browser(BrowserRenderer),
    Http(HttpRenderer),
}

impl Renderer {
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.renderer {
            RenderBackend::Browser => {
                let options = BrowserOptions {
                    headless: config.headless,
                    request_timeout: config.render_timeout(),
                };
                Ok(Renderer::Browser(BrowserRenderer::launch(options).await?))
            }
            RenderBackend::Http => Ok(Renderer::Http(HttpRenderer::new())),
        }
    }

    /// Release browser resources. A no-op for the HTTP backend.
    pub async fn shutdown(self) {
        if let Renderer::Browser(browser) = self {
            browser.shutdown().await;
        }
    }
}

impl PageRenderer for Renderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String> {
        match self {
            Renderer::Browser(r) => r.render(url, timeout).await,
            Renderer::Http(r) => r.render(url, timeout).await,
        }
    }
}

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

/// A user agent picked at random for each page.
pub(crate) fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Fail with [`HltvError::Navigation`] unless the document response was a
/// success or a redirect.
pub(crate) fn check_document_status(url: &str, status: i64) -> Result<()> {
    if (200..400).contains(&status) {
        Ok(())
    } else {
        Err(HltvError::Navigation {
            url: url.to_owned(),
            reason: format!("status {status}"),
        })
    }
}

/// Run `fut`, failing with [`HltvError::RenderTimeout`] after `timeout`.
pub(crate) async fn with_timeout<T>(
    url: &str,
    timeout: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| HltvError::RenderTimeout {
            url: url.to_owned(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })?
}
