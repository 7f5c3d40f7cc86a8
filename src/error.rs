use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid record {register_id}: {message}")]
    InvalidRecord { register_id: u64, message: String },

    #[error("Duplicate register_id: {0}")]
    DuplicateRecord(u64),

    #[error("Invalid route '{0}': expected origin-destination")]
    InvalidRoute(String),

    #[error("Unknown {column} value: {value}")]
    UnknownDimensionValue { column: &'static str, value: String },

    #[error("Slice {slice} cannot be applied: {reason}")]
    InvalidSlice { slice: String, reason: String },

    #[error("Artifact writer stopped")]
    WriterClosed,
}
