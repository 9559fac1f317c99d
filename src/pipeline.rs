// src/pipeline.rs
use crate::{
    error::Result,
    fetch::Fetcher,
    process,
    publish::{ObjectStore, Publisher},
    sources::SourceDescriptor,
};
use tracing::{error, info, info_span, Instrument};

/// Result of one fetch → clean → publish cycle.
#[derive(Debug)]
pub struct ItemOutcome {
    pub descriptor: SourceDescriptor,
    pub result: Result<String>,
}

/// Every item's outcome, in descriptor order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl RunReport {
    /// Locations of every successful upload, in descriptor order.
    pub fn locations(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(String::as_str))
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Sequential batch runner over a fixed list of sources.
pub struct Pipeline<S> {
    fetcher: Fetcher,
    publisher: Publisher<S>,
    sources: Vec<SourceDescriptor>,
}

impl<S: ObjectStore> Pipeline<S> {
    pub fn new(fetcher: Fetcher, publisher: Publisher<S>, sources: Vec<SourceDescriptor>) -> Self {
        Self {
            fetcher,
            publisher,
            sources,
        }
    }

    /// Process every source in order. A failing item is logged and skipped;
    /// the batch itself never fails.
    pub async fn run(&self) -> RunReport {
        info!(
            sources = self.sources.len(),
            bucket = self.publisher.bucket(),
            "batch start"
        );

        let mut report = RunReport::default();
        let mut current_election = None;
        for descriptor in &self.sources {
            if current_election != Some(descriptor.election_number) {
                current_election = Some(descriptor.election_number);
                info!(
                    election = descriptor.election_number,
                    year = descriptor.election_year,
                    "election start"
                );
            }

            let span = info_span!(
                "item",
                data_type = %descriptor.data_type,
                year = descriptor.election_year
            );
            let result = self.run_item(descriptor).instrument(span).await;
            if let Err(e) = &result {
                error!(
                    data_type = %descriptor.data_type,
                    year = descriptor.election_year,
                    kind = e.kind(),
                    error = %e,
                    "item failed, continuing"
                );
            }
            report.outcomes.push(ItemOutcome {
                descriptor: descriptor.clone(),
                result,
            });
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch complete"
        );
        for location in report.locations() {
            info!(%location, "uploaded");
        }
        report
    }

    async fn run_item(&self, descriptor: &SourceDescriptor) -> Result<String> {
        let data_type = descriptor.data_type.as_str();
        let year = descriptor.election_year;

        let raw = self
            .fetcher
            .fetch(&descriptor.source_url, &descriptor.description())
            .await?;
        let cleaned = process::clean(raw, data_type, year)?;
        self.publisher.publish(&cleaned, data_type, year).await
    }
}
