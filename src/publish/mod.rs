// src/publish/mod.rs
use crate::{
    config::Config,
    error::{PipelineError, Result},
    process::Table,
};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use tracing::{error, info};

pub mod gcs;

pub use gcs::GcsStore;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Object storage seam: a single whole-object write.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<()>;
}

/// `<prefix>/election_<year>_<data_type>_<YYYYMMDD_HHMMSS>.csv`
pub fn object_key(prefix: &str, year: i32, data_type: &str, at: NaiveDateTime) -> String {
    let file = format!(
        "election_{}_{}_{}.csv",
        year,
        data_type,
        at.format("%Y%m%d_%H%M%S")
    );
    if prefix.is_empty() {
        file
    } else {
        format!("{}/{}", prefix, file)
    }
}

/// Serializes tables to CSV and writes each one to a fresh, timestamped key.
pub struct Publisher<S> {
    store: S,
    bucket: String,
    prefix: String,
    timeout: Duration,
}

impl<S: ObjectStore> Publisher<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            bucket: config.bucket.clone(),
            prefix: config.object_prefix.clone(),
            timeout: config.publish_timeout,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload `table` and return its `gs://` location once the write succeeded.
    pub async fn publish(&self, table: &Table, data_type: &str, year: i32) -> Result<String> {
        self.publish_at(table, data_type, year, Local::now().naive_local())
            .await
    }

    #[tracing::instrument(level = "info", skip(self, table), fields(bucket = %self.bucket))]
    pub async fn publish_at(
        &self,
        table: &Table,
        data_type: &str,
        year: i32,
        at: NaiveDateTime,
    ) -> Result<String> {
        let key = object_key(&self.prefix, year, data_type, at);
        let location = format!("gs://{}/{}", self.bucket, key);
        let fail = |reason: String| {
            error!(%location, %reason, "upload failed");
            PipelineError::Publish {
                location: location.clone(),
                reason,
            }
        };

        let body = table
            .to_csv()
            .map_err(|e| fail(format!("serializing CSV: {}", e)))?;
        let bytes = body.len();
        info!(%location, rows = table.num_rows(), bytes, "upload start");

        match tokio::time::timeout(
            self.timeout,
            self.store.put(&self.bucket, &key, body, CSV_CONTENT_TYPE),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(fail(format!("{:#}", e))),
            Err(_) => return Err(fail(format!("timed out after {:?}", self.timeout))),
        }

        info!(%location, "upload complete");
        Ok(location)
    }
}
