use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub key: String,
    pub frequency: u64,
    pub frequency_pct: Decimal,
    pub total_value: Decimal,
    pub total_value_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub key: String,
    pub frequency: u64,
    pub frequency_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRow {
    pub key: String,
    pub total_value: Decimal,
    pub total_value_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub year: String,
    pub frequency_pct: Decimal,
    pub total_value_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    Metrics(Vec<MetricsRow>),
    Frequency(Vec<FrequencyRow>),
    Value(Vec<ValueRow>),
    Summary(Vec<SummaryRow>),
}

impl Rows {
    pub fn len(&self) -> usize {
        match self {
            Rows::Metrics(rows) => rows.len(),
            Rows::Frequency(rows) => rows.len(),
            Rows::Value(rows) => rows.len(),
            Rows::Summary(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A table ready to be written. `key_column` names the first column
/// (`route`, `transport_mode`, `country`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub key_column: &'static str,
    pub rows: Rows,
}

impl Table {
    pub fn headers(&self) -> Vec<&'static str> {
        let rest: &[&'static str] = match self.rows {
            Rows::Metrics(_) => &["frequency", "frequency_pct", "total_value", "total_value_pct"],
            Rows::Frequency(_) => &["frequency", "frequency_pct"],
            Rows::Value(_) => &["total_value", "total_value_pct"],
            Rows::Summary(_) => &["frequency_pct", "total_value_pct"],
        };
        std::iter::once(self.key_column)
            .chain(rest.iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub path: PathBuf,
    pub table: Table,
}
