use clap::Parser;
use std::path::PathBuf;

use super::RenderBackend;

/// Scrape upcoming HLTV matches once and write them to disk.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the JSON configuration file
    #[arg(long, env = "HLTV_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Directory to write match output to (overrides the config file)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Number of matches scraped at once (overrides the config file)
    #[arg(long, env = "HLTV_MAX_CONCURRENT_TASKS")]
    pub max_concurrent_tasks: Option<usize>,

    /// Render backend: browser or http (overrides the config file)
    #[arg(long)]
    pub renderer: Option<RenderBackend>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
