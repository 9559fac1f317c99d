use arrow::error::ArrowError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("malformed CSV from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ArrowError,
    },

    #[error("cleaning failed: {source}")]
    Clean {
        #[source]
        source: ArrowError,
    },

    #[error("publish to {location} failed: {reason}")]
    Publish { location: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    /// Short tag used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Fetch { .. } => "fetch",
            PipelineError::Parse { .. } => "parse",
            PipelineError::Clean { .. } => "clean",
            PipelineError::Publish { .. } => "publish",
            PipelineError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        let reason = match err.status() {
            Some(status) => format!("HTTP status {}", status),
            None if err.is_timeout() => "request timed out".to_string(),
            None => err.to_string(),
        };
        PipelineError::Fetch { url, reason }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
