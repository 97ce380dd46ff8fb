use ::scraper::error::SelectorErrorKind;
use std::num::ParseIntError;
use std::path::PathBuf;

/// All errors that can occur while rendering, scraping or persisting HLTV data.
#[derive(thiserror::Error, Debug)]
pub enum HltvError {
    /// Rendering a page took longer than the configured budget.
    #[error("rendering {url} timed out after {timeout_ms} ms")]
    RenderTimeout { url: String, timeout_ms: u64 },

    /// The browser failed to navigate to the page or to serialize it.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// HTTP request failed (network, DNS, TLS, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The headless browser could not be launched or configured.
    #[error("browser error: {0}")]
    Browser(String),

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// Failed to parse an integer from scraped text.
    #[error("failed to parse integer: {0}")]
    IntParse(#[from] ParseIntError),

    /// A fragment without which the record is meaningless was not found.
    #[error("required fragment missing: {context}")]
    RequiredFragmentMissing { context: &'static str },

    /// Building one match record failed; the rest of the run continues.
    #[error("failed to fetch match {url}: {source}")]
    MatchFetchFailed {
        url: String,
        source: Box<HltvError>,
    },

    /// The run was asked to stop before this operation could start.
    #[error("operation cancelled")]
    Cancelled,

    /// Invalid configuration value.
    #[error("invalid configuration in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HltvError {
    /// Whether this error is a render timeout, the only error worth retrying.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HltvError::RenderTimeout { .. })
    }
}

impl<'a> From<SelectorErrorKind<'a>> for HltvError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        HltvError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HltvError>;
