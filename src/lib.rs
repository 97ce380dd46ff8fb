//! Scrape upcoming Counter-Strike matches from HLTV.org.
//!
//! [`HltvClient`] renders pages through a [`PageRenderer`] and turns them into
//! [`MatchRecord`]s: lineups, map pool, recent form, head-to-head, per-player
//! statistics, the optional analytics panel and six team statistics pages.
//! [`Pipeline`] runs that for every discovered match with a bounded number of
//! matches in flight and writes each record through an [`OutputSink`].

mod client;
pub mod config;
mod error;
mod gate;
pub mod model;
pub mod output;
mod pipeline;
pub mod render;
mod scraper;

pub use client::HltvClient;
pub use config::{Args, Config, RenderBackend};
pub use error::{HltvError, Result};
pub use gate::{Admission, AdmissionGate};
pub use model::*;
pub use output::OutputSink;
pub use pipeline::{Pipeline, RunSummary};
pub use render::{BrowserOptions, BrowserRenderer, HttpRenderer, PageRenderer, Renderer};
pub use scraper::team::{stats_window, team_slug};
