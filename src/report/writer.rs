use crate::report::tables::{Artifact, Rows};

use anyhow::Context;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::io::Write;
use tokio::sync::mpsc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriterStats {
    pub written: usize,
    pub failed: usize,
}

/// Drain `rx`, writing each artifact to disk. A failed write is logged and
/// does not stop the remaining artifacts.
pub async fn run(mut rx: mpsc::Receiver<Artifact>) -> WriterStats {
    let mut stats = WriterStats::default();

    while let Some(artifact) = rx.recv().await {
        match write_artifact(&artifact) {
            Ok(()) => {
                stats.written += 1;
                log::debug!("Wrote {}", artifact.path.display());
            }
            Err(e) => {
                stats.failed += 1;
                log::error!("Failed to write {}: {e:#}", artifact.path.display());
            }
        }
    }

    stats
}

pub fn write_artifact(artifact: &Artifact) -> anyhow::Result<()> {
    if let Some(parent) = artifact.path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_path(&artifact.path)
        .with_context(|| format!("opening {}", artifact.path.display()))?;

    wtr.write_record(artifact.table.headers())?;
    match &artifact.table.rows {
        Rows::Metrics(rows) => serialize_rows(&mut wtr, rows)?,
        Rows::Frequency(rows) => serialize_rows(&mut wtr, rows)?,
        Rows::Value(rows) => serialize_rows(&mut wtr, rows)?,
        Rows::Summary(rows) => serialize_rows(&mut wtr, rows)?,
    }
    wtr.flush()?;

    Ok(())
}

fn serialize_rows<W: Write, T: Serialize>(wtr: &mut csv::Writer<W>, rows: &[T]) -> csv::Result<()> {
    for row in rows {
        wtr.serialize(row)?;
    }
    Ok(())
}
