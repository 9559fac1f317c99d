use crate::error::{PipelineError, Result};
use std::{env, time::Duration};

pub const DEFAULT_BUCKET: &str = "election-data-for-portforio";
pub const DEFAULT_PROJECT_ID: &str = "election-data-pipeline-48780";
pub const DEFAULT_SOURCE_BASE_URL: &str = "https://yukiyanai.github.io/jp/resources/data";
pub const DEFAULT_OBJECT_PREFIX: &str = "raw";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PUBLISH_TIMEOUT_SECS: u64 = 60;

/// Run configuration, resolved once at start-up and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Destination bucket (`GCS_BUCKET_NAME`).
    pub bucket: String,
    /// Project the storage client is bound to (`GCS_PROJECT_ID`).
    pub project_id: String,
    /// Directory holding the `hr<year>_<data_type>.csv` files (`ELECTION_SOURCE_BASE_URL`).
    pub source_base_url: String,
    /// Leading path segment of every object key (`GCS_OBJECT_PREFIX`).
    pub object_prefix: String,
    pub fetch_timeout: Duration,
    pub publish_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            source_base_url: DEFAULT_SOURCE_BASE_URL.to_string(),
            object_prefix: DEFAULT_OBJECT_PREFIX.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            publish_timeout: Duration::from_secs(DEFAULT_PUBLISH_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset or blank keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let secs = |key: &str, default: u64| -> Result<Duration> {
            match get(key) {
                None => Ok(Duration::from_secs(default)),
                Some(raw) => match raw.parse::<u64>() {
                    Ok(0) => Err(PipelineError::Config(format!("{} must be positive", key))),
                    Ok(n) => Ok(Duration::from_secs(n)),
                    Err(e) => Err(PipelineError::Config(format!(
                        "{}={:?} is not a number of seconds: {}",
                        key, raw, e
                    ))),
                },
            }
        };

        let defaults = Self::default();
        Ok(Self {
            bucket: get("GCS_BUCKET_NAME").unwrap_or(defaults.bucket),
            project_id: get("GCS_PROJECT_ID").unwrap_or(defaults.project_id),
            source_base_url: get("ELECTION_SOURCE_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.source_base_url),
            object_prefix: get("GCS_OBJECT_PREFIX")
                .map(|p| p.trim_matches('/').to_string())
                .unwrap_or(defaults.object_prefix),
            fetch_timeout: secs("FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?,
            publish_timeout: secs("PUBLISH_TIMEOUT_SECS", DEFAULT_PUBLISH_TIMEOUT_SECS)?,
        })
    }
}
