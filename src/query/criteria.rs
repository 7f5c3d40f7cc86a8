use crate::dataset::Column;

use rust_decimal::Decimal;
use std::fmt;

/// Optional row predicates. An absent field places no constraint on its
/// column; present fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub direction: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    /// `DD/MM/YYYY`
    pub start_date: Option<String>,
    /// `DD/MM/YYYY`
    pub end_date: Option<String>,
    pub product: Option<String>,
    pub transport_mode: Option<String>,
    pub company_name: Option<String>,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn direction(mut self, value: impl Into<String>) -> Self {
        self.direction = Some(value.into());
        self
    }

    #[must_use]
    pub fn origin(mut self, value: impl Into<String>) -> Self {
        self.origin = Some(value.into());
        self
    }

    #[must_use]
    pub fn destination(mut self, value: impl Into<String>) -> Self {
        self.destination = Some(value.into());
        self
    }

    #[must_use]
    pub fn start_year(mut self, year: i32) -> Self {
        self.start_year = Some(year);
        self
    }

    #[must_use]
    pub fn end_year(mut self, year: i32) -> Self {
        self.end_year = Some(year);
        self
    }

    /// Shorthand for `start_year(year).end_year(year)`.
    #[must_use]
    pub fn year(self, year: i32) -> Self {
        self.start_year(year).end_year(year)
    }

    #[must_use]
    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn product(mut self, value: impl Into<String>) -> Self {
        self.product = Some(value.into());
        self
    }

    #[must_use]
    pub fn transport_mode(mut self, value: impl Into<String>) -> Self {
        self.transport_mode = Some(value.into());
        self
    }

    #[must_use]
    pub fn company_name(mut self, value: impl Into<String>) -> Self {
        self.company_name = Some(value.into());
        self
    }

    #[must_use]
    pub fn min_value(mut self, value: Decimal) -> Self {
        self.min_value = Some(value);
        self
    }

    #[must_use]
    pub fn max_value(mut self, value: Decimal) -> Self {
        self.max_value = Some(value);
        self
    }

    /// Categorical criteria that are set, paired with their column.
    pub(crate) fn categorical(&self) -> Vec<(Column, &str)> {
        [
            (Column::Direction, &self.direction),
            (Column::Origin, &self.origin),
            (Column::Destination, &self.destination),
            (Column::Product, &self.product),
            (Column::TransportMode, &self.transport_mode),
            (Column::CompanyName, &self.company_name),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
        .collect()
    }
}

/// One criterion as reported back in a [`super::filter::FilterOutcome`].
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Category { column: Column, value: String },
    StartYear(i32),
    EndYear(i32),
    StartDate(String),
    EndDate(String),
    MinValue(Decimal),
    MaxValue(Decimal),
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Category { column, value } => write!(f, "{column}={value}"),
            Criterion::StartYear(year) => write!(f, "start_year={year}"),
            Criterion::EndYear(year) => write!(f, "end_year={year}"),
            Criterion::StartDate(date) => write!(f, "start_date={date}"),
            Criterion::EndDate(date) => write!(f, "end_date={date}"),
            Criterion::MinValue(value) => write!(f, "min_value={value}"),
            Criterion::MaxValue(value) => write!(f, "max_value={value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_sets_both_bounds() {
        let criteria = FilterCriteria::new().year(2017);
        assert_eq!(criteria.start_year, Some(2017));
        assert_eq!(criteria.end_year, Some(2017));
    }

    #[test]
    fn test_categorical_lists_only_set_columns() {
        let criteria = FilterCriteria::new()
            .destination("Mexico")
            .direction("Imports")
            .start_year(2015);

        assert_eq!(
            criteria.categorical(),
            vec![(Column::Direction, "Imports"), (Column::Destination, "Mexico")]
        );
    }
}
