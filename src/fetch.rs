// src/fetch.rs

use crate::{
    error::{PipelineError, Result},
    process::Table,
};
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Downloads source CSVs over HTTP(S) with a bounded per-request timeout.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Config(format!("building HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// GET `url` and parse the body as CSV. `description` only labels log lines.
    ///
    /// Non-2xx statuses, timeouts and transport errors are `Fetch` errors and no
    /// table is built. Bodies that are not valid CSV are `Parse` errors.
    #[tracing::instrument(level = "info", skip(self, url), fields(%url))]
    pub async fn fetch(&self, url: &str, description: &str) -> Result<Table> {
        info!("fetch start");

        let parsed = Url::parse(url).map_err(|e| PipelineError::Fetch {
            url: url.to_string(),
            reason: format!("invalid URL: {}", e),
        })?;

        let bytes = match self.download(parsed).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "download failed");
                return Err(e);
            }
        };

        let table = Table::from_csv(&bytes).map_err(|source| {
            error!(error = %source, "CSV parse failed");
            PipelineError::Parse {
                url: url.to_string(),
                source,
            }
        })?;

        info!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "fetch complete"
        );
        Ok(table)
    }

    async fn download(&self, url: Url) -> Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
}
