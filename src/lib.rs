pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod publish;
pub mod sources;

#[cfg(test)]
mod testutil;

pub use config::Config;
pub use error::{PipelineError, Result};
pub use pipeline::{ItemOutcome, Pipeline, RunReport};
pub use process::{ColumnKind, Table};
pub use sources::{election_sources, DataType, SourceDescriptor};
