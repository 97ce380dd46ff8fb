use std::sync::Mutex;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventResponseReceived, ResourceType, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::{EventDomContentEventFired, NavigateParams};
use chromiumoxide::error::CdpError;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::{check_document_status, random_user_agent, with_timeout, PageRenderer};
use crate::error::{HltvError, Result};

/// How long to wait for the document response once the DOM is ready.
const STATUS_WAIT: Duration = Duration::from_secs(5);

/// Launch options for [`BrowserRenderer`].
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    /// Budget for a single DevTools command.
    pub request_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Renders pages in a shared headless Chromium.
///
/// Tabs are pooled: a render borrows an idle tab (or opens a new one), gives
/// it a fresh random user agent, and hands it back once the markup has been
/// captured. A tab whose render failed or was cancelled is closed rather
/// than reused. The number of tabs alive at once is bounded by how many
/// renders the caller lets run concurrently.
pub struct BrowserRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    idle: Mutex<Vec<Page>>,
}

impl BrowserRenderer {
    #[instrument]
    pub async fn launch(options: BrowserOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(options.request_timeout);
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(HltvError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| HltvError::Browser(e.to_string()))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser handler event failed");
                }
            }
        });
        info!("launched headless browser");

        Ok(Self {
            browser,
            handler,
            idle: Mutex::new(Vec::new()),
        })
    }

    async fn checkout(&self) -> Result<PooledPage<'_>> {
        let reused = self.idle.lock().ok().and_then(|mut idle| idle.pop());
        let page = match reused {
            Some(page) => page,
            None => self
                .browser
                .new_page("about:blank")
                .await
                .map_err(|e| HltvError::Browser(e.to_string()))?,
        };
        Ok(PooledPage {
            page,
            idle: &self.idle,
            reusable: false,
        })
    }

    /// Close all pooled tabs and the browser process.
    pub async fn shutdown(mut self) {
        let pages = self
            .idle
            .lock()
            .map(|mut idle| std::mem::take(&mut *idle))
            .unwrap_or_default();
        for page in pages {
            if let Err(e) = page.close().await {
                debug!(error = %e, "failed to close pooled page");
            }
        }
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "failed to close browser");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "failed to wait for browser exit");
        }
        self.handler.abort();
        info!("browser shut down");
    }
}

impl PageRenderer for BrowserRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String> {
        with_timeout(url, timeout, async {
            let mut page = self.checkout().await?;
            let navigation = |e: CdpError| HltvError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            };

            page.page
                .set_user_agent(SetUserAgentOverrideParams::new(random_user_agent()))
                .await
                .map_err(navigation)?;
            let mut responses = page
                .page
                .event_listener::<EventResponseReceived>()
                .await
                .map_err(navigation)?;
            let mut dom_ready = page
                .page
                .event_listener::<EventDomContentEventFired>()
                .await
                .map_err(navigation)?;

            let navigated = page
                .page
                .execute(NavigateParams::new(url))
                .await
                .map_err(navigation)?;
            if let Some(reason) = navigated.result.error_text.clone() {
                return Err(HltvError::Navigation {
                    url: url.to_owned(),
                    reason,
                });
            }
            dom_ready.next().await;

            match document_status(&mut responses).await {
                Some(status) => check_document_status(url, status)?,
                None => debug!(url, "no document response seen"),
            }
            let content = page.page.content().await.map_err(navigation)?;

            page.reusable = true;
            debug!(url, bytes = content.len(), "rendered page");
            Ok(content)
        })
        .await
    }
}

/// Status of the first document response on the tab. Redirects are not
/// reported as responses, so this is the final status of the navigation.
async fn document_status(responses: &mut EventStream<EventResponseReceived>) -> Option<i64> {
    let first_document = async {
        while let Some(event) = responses.next().await {
            if event.r#type == ResourceType::Document {
                return Some(event.response.status);
            }
        }
        None
    };
    tokio::time::timeout(STATUS_WAIT, first_document)
        .await
        .ok()
        .flatten()
}

/// A tab borrowed from the pool, returned to it on drop.
struct PooledPage<'a> {
    page: Page,
    idle: &'a Mutex<Vec<Page>>,
    reusable: bool,
}

impl Drop for PooledPage<'_> {
    fn drop(&mut self) {
        let page = self.page.clone();
        if self.reusable {
            if let Ok(mut idle) = self.idle.lock() {
                idle.push(page);
                return;
            }
        }
        tokio::spawn(async move {
            if let Err(e) = page.close().await {
                debug!(error = %e, "failed to close discarded page");
            }
        });
    }
}
