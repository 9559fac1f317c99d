use anyhow::{bail, Context, Result};
use election_stage::{
    election_sources,
    fetch::Fetcher,
    publish::{GcsStore, Publisher},
    Config, Pipeline,
};
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()))
    });
    fmt().with_env_filter(env_filter).with_target(false).init();
    info!("startup");

    // ─── 2) resolve configuration ────────────────────────────────────
    let config = Config::from_env().context("reading configuration from environment")?;
    info!(
        bucket = %config.bucket,
        project = %config.project_id,
        source = %config.source_base_url,
        "configuration"
    );

    // ─── 3) build clients ────────────────────────────────────────────
    let fetcher = Fetcher::new(config.fetch_timeout)?;
    let store = GcsStore::connect(&config.project_id).await?;
    let publisher = Publisher::new(store, &config);
    let sources = election_sources(&config.source_base_url);

    // ─── 4) run the batch ────────────────────────────────────────────
    let report = Pipeline::new(fetcher, publisher, sources).run().await;

    for failure in report.failures() {
        if let Err(e) = &failure.result {
            warn!(
                item = %failure.descriptor.description(),
                error = %e,
                "not uploaded"
            );
        }
    }

    // ─── 5) emit locations ───────────────────────────────────────────
    let locations = report.locations();
    println!("{}", serde_json::to_string_pretty(&locations)?);

    if locations.is_empty() && !report.outcomes.is_empty() {
        error!(failed = report.failed(), "no item was uploaded");
        bail!("all {} items failed", report.failed());
    }

    info!(
        uploaded = locations.len(),
        failed = report.failed(),
        "all done"
    );
    Ok(())
}
