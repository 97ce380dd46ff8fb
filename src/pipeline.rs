use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::client::HltvClient;
use crate::config::Config;
use crate::error::{HltvError, Result};
use crate::gate::AdmissionGate;
use crate::output::OutputSink;
use crate::render::PageRenderer;

/// Outcome counts of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub discovered: usize,
    pub written: usize,
    pub failed: usize,
}

/// One scrape of the upcoming matches: discover, build every match record
/// with bounded concurrency, and persist each one as soon as it is complete.
///
/// A match that fails is logged and counted; it never stops the others.
pub struct Pipeline<R> {
    client: HltvClient<R>,
    sink: OutputSink,
    match_gate: AdmissionGate,
    match_limit: Option<usize>,
}

impl<R: PageRenderer> Pipeline<R> {
    pub fn new(client: HltvClient<R>, sink: OutputSink, max_concurrent_tasks: usize) -> Self {
        Self {
            client,
            sink,
            match_gate: AdmissionGate::new(max_concurrent_tasks),
            match_limit: None,
        }
    }

    pub fn from_config(client: HltvClient<R>, config: &Config) -> Self {
        Self::new(
            client,
            OutputSink::new(&config.output_dir),
            config.max_concurrent_tasks,
        )
        .with_match_limit(config.match_limit)
    }

    /// Process at most `limit` of the discovered matches.
    pub fn with_match_limit(mut self, limit: Option<usize>) -> Self {
        self.match_limit = limit;
        self
    }

    /// The gate bounding how many matches are built at once.
    pub fn gate(&self) -> &AdmissionGate {
        &self.match_gate
    }

    pub fn client(&self) -> &HltvClient<R> {
        &self.client
    }

    pub fn into_client(self) -> HltvClient<R> {
        self.client
    }

    /// Stop admitting work. Matches already past admission keep their
    /// permits until their futures finish or are dropped.
    pub fn cancel(&self) {
        self.match_gate.close();
        self.client.render_gate().close();
    }

    /// Discover upcoming matches and process all of them.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<RunSummary> {
        let mut urls = self.client.get_match_urls().await?;
        if let Some(limit) = self.match_limit {
            urls.truncate(limit);
        }
        info!(count = urls.len(), "discovered matches");
        Ok(self.run_urls(&urls).await)
    }

    /// Process the given match URLs.
    pub async fn run_urls(&self, urls: &[String]) -> RunSummary {
        let outcomes = join_all(urls.iter().map(|url| self.process(url))).await;

        let mut summary = RunSummary {
            discovered: urls.len(),
            ..RunSummary::default()
        };
        for (url, outcome) in urls.iter().zip(outcomes) {
            match outcome {
                Ok(()) => summary.written += 1,
                Err(HltvError::Cancelled) => {
                    debug!(url = %url, "match skipped after cancellation");
                    summary.failed += 1;
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "match failed");
                    summary.failed += 1;
                }
            }
        }
        info!(
            discovered = summary.discovered,
            written = summary.written,
            failed = summary.failed,
            "run finished"
        );
        summary
    }

    async fn process(&self, url: &str) -> Result<()> {
        let _admission = self.match_gate.admit().await?;
        let record = self.client.get_match(url).await?;
        self.sink.write_match(&record)?;
        Ok(())
    }
}
