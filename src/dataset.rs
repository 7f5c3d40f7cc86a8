use crate::error::AnalysisError;
use crate::transaction::Transaction;

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Categorical columns of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Direction,
    Origin,
    Destination,
    Product,
    TransportMode,
    CompanyName,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Direction,
        Column::Origin,
        Column::Destination,
        Column::Product,
        Column::TransportMode,
        Column::CompanyName,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Direction => "direction",
            Column::Origin => "origin",
            Column::Destination => "destination",
            Column::Product => "product",
            Column::TransportMode => "transport_mode",
            Column::CompanyName => "company_name",
        }
    }

    pub fn value_of<'a>(&self, tx: &'a Transaction) -> &'a str {
        match self {
            Column::Direction => &tx.direction,
            Column::Origin => &tx.origin,
            Column::Destination => &tx.destination,
            Column::Product => &tx.product,
            Column::TransportMode => &tx.transport_mode,
            Column::CompanyName => &tx.company_name,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Distinct values of one column, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Domain {
    values: Vec<String>,
    members: HashSet<String>,
}

impl Domain {
    fn insert(&mut self, value: &str) {
        if self.members.insert(value.to_string()) {
            self.values.push(value.to_string());
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.members.contains(value)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// The loaded transaction table. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Transaction>,
    index: HashMap<u64, usize>,
    domains: HashMap<Column, Domain>,
    min_year: Option<i32>,
}

impl Dataset {
    pub fn from_records(records: Vec<Transaction>) -> Result<Self, AnalysisError> {
        let mut index = HashMap::with_capacity(records.len());
        let mut domains: HashMap<Column, Domain> = HashMap::new();
        let mut min_year: Option<i32> = None;

        for (position, tx) in records.iter().enumerate() {
            if index.insert(tx.register_id, position).is_some() {
                return Err(AnalysisError::DuplicateRecord(tx.register_id));
            }
            for column in Column::ALL {
                domains.entry(column).or_default().insert(column.value_of(tx));
            }
            min_year = Some(min_year.map_or(tx.year, |y| y.min(tx.year)));
        }

        Ok(Self {
            records,
            index,
            domains,
            min_year,
        })
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn get(&self, register_id: u64) -> Option<&Transaction> {
        self.index.get(&register_id).map(|&i| &self.records[i])
    }

    /// Distinct values observed for `column`, first-seen order.
    pub fn unique_values(&self, column: Column) -> &[String] {
        self.domains
            .get(&column)
            .map(|domain| domain.values())
            .unwrap_or(&[])
    }

    pub fn contains_value(&self, column: Column, value: &str) -> bool {
        self.domains
            .get(&column)
            .is_some_and(|domain| domain.contains(value))
    }

    /// Earliest year in the dataset, `None` when empty.
    pub fn min_year(&self) -> Option<i32> {
        self.min_year
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
