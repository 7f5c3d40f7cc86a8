//! Analysis drivers and the artifact writer that sits behind them.
//!
//! ```text
//!  Dataset ──► Aggregator ──► Driver ──mpsc──► writer ──► <root>/option_N/.../*.csv
//! ```

pub mod config;
pub mod driver;
pub mod tables;
pub mod writer;

use crate::dataset::Dataset;
use crate::query::{Aggregator, Filter};
use anyhow::Context;
use tokio::sync::mpsc;

pub use config::AnalysisConfig;
pub use driver::{Driver, RunSummary};
pub use writer::WriterStats;

const ARTIFACT_CHANNEL_CAPACITY: usize = 100;

/// Run every analysis option over `dataset` and write the tables under
/// `config.output_root`.
pub async fn run(
    dataset: &Dataset,
    config: &AnalysisConfig,
) -> anyhow::Result<(RunSummary, WriterStats)> {
    let (tx, rx) = mpsc::channel::<tables::Artifact>(ARTIFACT_CHANNEL_CAPACITY);
    let writer = tokio::spawn(writer::run(rx));

    let aggregator = Aggregator::new(Filter::new(dataset));
    let summary = Driver::new(aggregator, config, tx).run().await?;
    let stats = writer.await.context("artifact writer task failed")?;

    Ok((summary, stats))
}
