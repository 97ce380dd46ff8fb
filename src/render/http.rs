use std::time::Duration;

use reqwest::header::USER_AGENT;
use tracing::debug;

use super::{random_user_agent, with_timeout, PageRenderer};
use crate::error::{HltvError, Result};

/// Fetches pages over plain HTTP; no scripts are executed.
pub struct HttpRenderer {
    http: reqwest::Client,
}

impl HttpRenderer {
    /// Create a renderer with a default [`reqwest::Client`].
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Create a renderer using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { http: client }
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");

        let response = self
            .http
            .get(url)
            .header(USER_AGENT, random_user_agent())
            .send()
            .await
            .map_err(|e| HltvError::Http {
                url: url.to_owned(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HltvError::UnexpectedStatus {
                url: url.to_owned(),
                status,
            });
        }

        response.text().await.map_err(|e| HltvError::ResponseBody {
            url: url.to_owned(),
            source: e,
        })
    }
}

impl Default for HttpRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String> {
        with_timeout(url, timeout, self.fetch(url)).await
    }
}
