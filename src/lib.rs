pub mod dataset;
pub mod error;
pub mod query;
pub mod report;
pub mod transaction;

use crate::dataset::Dataset;
use crate::error::AnalysisError;
use crate::transaction::{CsvTransaction, Transaction};
use csv::ReaderBuilder;
use std::fs::File;

/// Load the whole CSV at `path` into a [`Dataset`].
///
/// Any malformed row aborts the load; there is no partial dataset.
pub fn load_dataset(path: &str) -> Result<Dataset, AnalysisError> {
    let file = File::open(path)?;
    let rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let records = rdr
        .into_deserialize::<CsvTransaction>()
        .map(|result| Transaction::try_from(result?))
        .collect::<Result<Vec<_>, _>>()?;

    let dataset = Dataset::from_records(records)?;
    log::info!("Loaded {} transactions from {}", dataset.len(), path);
    Ok(dataset)
}
