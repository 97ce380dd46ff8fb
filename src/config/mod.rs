use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::{HltvError, Result};

pub mod cli;

pub use cli::Args;

/// Which [`crate::render::PageRenderer`] backend to use.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Eq,
    PartialEq,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RenderBackend {
    #[default]
    Browser,
    Http,
}

/// Run configuration, loaded once at start-up.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Match pipelines allowed to run at once.
    pub max_concurrent_tasks: usize,
    /// Page renders allowed in flight at once, across all matches.
    pub max_concurrent_renders: usize,
    pub render_timeout_ms: u64,
    /// Extra attempts after a render timeout.
    pub render_retries: u32,
    pub renderer: RenderBackend,
    pub headless: bool,
    pub output_dir: PathBuf,
    pub match_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: 5,
            max_concurrent_renders: 10,
            render_timeout_ms: 60_000,
            render_retries: 1,
            renderer: RenderBackend::Browser,
            headless: true,
            output_dir: PathBuf::from("output"),
            match_limit: None,
        }
    }
}

impl Config {
    /// Load the configuration file at `path`, falling back to defaults if it
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let config: Config = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config.validate(path)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load the file named on the command line and apply CLI overrides.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = Self::load(&args.config)?;
        if let Some(dir) = &args.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(n) = args.max_concurrent_tasks {
            config.max_concurrent_tasks = n;
        }
        if let Some(renderer) = args.renderer {
            config.renderer = renderer;
        }
        config.validate(&args.config)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |reason: &str| HltvError::Config {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };
        if self.max_concurrent_tasks == 0 {
            return Err(invalid("max_concurrent_tasks must be at least 1"));
        }
        if self.max_concurrent_renders == 0 {
            return Err(invalid("max_concurrent_renders must be at least 1"));
        }
        if self.render_timeout_ms == 0 {
            return Err(invalid("render_timeout_ms must be positive"));
        }
        Ok(())
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }
}
