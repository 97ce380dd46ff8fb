use clap::Parser;
use tracing::{info, warn, Level};

use hltv_scraper::{Args, Config, HltvClient, Pipeline, Renderer, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let level = args.log_level.parse().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = Config::from_args(&args)?;
    let renderer = Renderer::from_config(&config).await?;
    let pipeline = Pipeline::from_config(HltvClient::from_config(renderer, &config), &config);

    let outcome = tokio::select! {
        result = pipeline.run() => Some(result),
        _ = tokio::signal::ctrl_c() => {
            pipeline.cancel();
            warn!("interrupted, in-flight matches dropped");
            None
        }
    };

    pipeline.into_client().into_renderer().shutdown().await;

    match outcome {
        Some(Ok(summary)) => {
            info!(
                discovered = summary.discovered,
                written = summary.written,
                failed = summary.failed,
                "scraping completed"
            );
            Ok(())
        }
        Some(Err(e)) => Err(e),
        None => Ok(()),
    }
}
