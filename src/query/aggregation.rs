use crate::dataset::Column;
use crate::error::AnalysisError;
use crate::query::criteria::FilterCriteria;
use crate::query::filter::{Filter, FilterOutcome};
use crate::query::ranking::Scores;

use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const ROUTE_SEPARATOR: char = '-';
const PERCENT_DECIMALS: u32 = 2;

/// Filter context shared by a group of aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slice {
    pub direction: Option<String>,
    pub year: Option<i32>,
    pub transport_mode: Option<String>,
}

impl Slice {
    pub fn new(direction: Option<&str>, year: Option<i32>) -> Self {
        Self {
            direction: direction.map(str::to_string),
            year,
            transport_mode: None,
        }
    }

    #[must_use]
    pub fn with_transport_mode(mut self, transport_mode: impl Into<String>) -> Self {
        self.transport_mode = Some(transport_mode.into());
        self
    }

    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        criteria.direction = self.direction.clone();
        criteria.start_year = self.year;
        criteria.end_year = self.year;
        criteria.transport_mode = self.transport_mode.clone();
        criteria
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = self.direction.as_deref().unwrap_or("All");
        match self.year {
            Some(year) => write!(f, "direction={direction} year={year}")?,
            None => write!(f, "direction={direction} year=All")?,
        }
        if let Some(mode) = &self.transport_mode {
            write!(f, " transport_mode={mode}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

impl Route {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ROUTE_SEPARATOR}{}", self.origin, self.destination)
    }
}

impl FromStr for Route {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(ROUTE_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(origin), Some(destination), None)
                if !origin.trim().is_empty() && !destination.trim().is_empty() =>
            {
                Ok(Route::new(origin.trim(), destination.trim()))
            }
            _ => Err(AnalysisError::InvalidRoute(s.to_string())),
        }
    }
}

/// A value along one aggregation axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dimension {
    Route(Route),
    TransportMode(String),
    Origin(String),
    Destination(String),
}

impl Dimension {
    fn criteria(&self, slice: &Slice) -> FilterCriteria {
        let criteria = slice.criteria();
        match self {
            Dimension::Route(route) => criteria
                .origin(route.origin.as_str())
                .destination(route.destination.as_str()),
            Dimension::TransportMode(mode) => criteria.transport_mode(mode.as_str()),
            Dimension::Origin(country) => criteria.origin(country.as_str()),
            Dimension::Destination(country) => criteria.destination(country.as_str()),
        }
    }

    fn columns(&self) -> Vec<(Column, &str)> {
        match self {
            Dimension::Route(route) => vec![
                (Column::Origin, route.origin.as_str()),
                (Column::Destination, route.destination.as_str()),
            ],
            Dimension::TransportMode(mode) => vec![(Column::TransportMode, mode.as_str())],
            Dimension::Origin(country) => vec![(Column::Origin, country.as_str())],
            Dimension::Destination(country) => vec![(Column::Destination, country.as_str())],
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Route(route) => write!(f, "{route}"),
            Dimension::TransportMode(value)
            | Dimension::Origin(value)
            | Dimension::Destination(value) => f.write_str(value),
        }
    }
}

/// Which side of a transaction a country's value is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryRole {
    Origin,
    Destination,
}

impl CountryRole {
    pub fn dimension(&self, country: &str) -> Dimension {
        match self {
            CountryRole::Origin => Dimension::Origin(country.to_string()),
            CountryRole::Destination => Dimension::Destination(country.to_string()),
        }
    }
}

/// Country value for one year: imports by destination, exports by origin,
/// and their merged total.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBreakdown {
    pub imports: Scores<Decimal>,
    pub exports: Scores<Decimal>,
    pub total: Scores<Decimal>,
    pub import_total: Decimal,
    pub export_total: Decimal,
}

impl CountryBreakdown {
    pub fn grand_total(&self) -> Decimal {
        self.import_total + self.export_total
    }
}

/// Counts, sums and percentages over a [`Filter`].
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    filter: Filter<'a>,
}

impl<'a> Aggregator<'a> {
    pub fn new(filter: Filter<'a>) -> Self {
        Self { filter }
    }

    fn slice_rows(&self, slice: &Slice) -> FilterOutcome<'a> {
        self.filter.apply(&slice.criteria())
    }

    pub fn total_count(&self, slice: &Slice) -> u64 {
        self.slice_rows(slice).len() as u64
    }

    pub fn total_value(&self, slice: &Slice) -> Decimal {
        self.slice_rows(slice).total_value()
    }

    /// Reject a slice whose direction, year or transport mode the filter
    /// would skip.
    pub fn check_slice(&self, slice: &Slice) -> Result<(), AnalysisError> {
        let outcome = self.slice_rows(slice);
        match outcome.skipped.first() {
            None => Ok(()),
            Some(skipped) => Err(AnalysisError::InvalidSlice {
                slice: slice.to_string(),
                reason: format!("{} ({})", skipped.criterion, skipped.reason),
            }),
        }
    }

    /// Reject dimension values the dataset has never seen, so that the
    /// filter cannot skip them and widen the result to the whole slice.
    pub fn validate(&self, dimension: &Dimension) -> Result<(), AnalysisError> {
        let dataset = self.filter.dataset();
        for (column, value) in dimension.columns() {
            if !dataset.contains_value(column, value) {
                return Err(AnalysisError::UnknownDimensionValue {
                    column: column.name(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    fn dimension_rows(
        &self,
        dimension: &Dimension,
        slice: &Slice,
    ) -> Result<FilterOutcome<'a>, AnalysisError> {
        self.validate(dimension)?;
        Ok(self.filter.apply(&dimension.criteria(slice)))
    }

    pub fn dimension_frequency(
        &self,
        dimension: &Dimension,
        slice: &Slice,
    ) -> Result<u64, AnalysisError> {
        Ok(self.dimension_rows(dimension, slice)?.len() as u64)
    }

    pub fn dimension_value_sum(
        &self,
        dimension: &Dimension,
        slice: &Slice,
    ) -> Result<Decimal, AnalysisError> {
        Ok(self.dimension_rows(dimension, slice)?.total_value())
    }

    /// Frequency of every candidate, in candidate order.
    pub fn frequencies(
        &self,
        candidates: &[Dimension],
        slice: &Slice,
    ) -> Result<Scores<u64>, AnalysisError> {
        candidates
            .iter()
            .map(|dimension| -> Result<_, AnalysisError> {
                Ok((dimension.to_string(), self.dimension_frequency(dimension, slice)?))
            })
            .collect()
    }

    /// Value sum of every candidate, in candidate order.
    pub fn value_sums(
        &self,
        candidates: &[Dimension],
        slice: &Slice,
    ) -> Result<Scores<Decimal>, AnalysisError> {
        candidates
            .iter()
            .map(|dimension| -> Result<_, AnalysisError> {
                Ok((dimension.to_string(), self.dimension_value_sum(dimension, slice)?))
            })
            .collect()
    }

    /// Distinct routes in first-seen order, optionally restricted to a direction.
    pub fn routes(&self, direction: Option<&str>) -> Vec<Route> {
        let mut criteria = FilterCriteria::new();
        criteria.direction = direction.map(str::to_string);

        let mut seen = HashSet::new();
        self.filter
            .apply(&criteria)
            .rows
            .into_iter()
            .map(|tx| Route::new(tx.origin.as_str(), tx.destination.as_str()))
            .filter(|route| seen.insert(route.clone()))
            .collect()
    }

    pub fn transport_modes(&self) -> Vec<String> {
        self.filter.dataset().unique_values(Column::TransportMode).to_vec()
    }

    pub fn origin_countries(&self) -> Vec<String> {
        self.filter.dataset().unique_values(Column::Origin).to_vec()
    }

    pub fn destination_countries(&self) -> Vec<String> {
        self.filter.dataset().unique_values(Column::Destination).to_vec()
    }

    /// Value per country under `slice`, attributing each row to `role`.
    pub fn country_values(
        &self,
        role: CountryRole,
        countries: &[String],
        slice: &Slice,
    ) -> Result<Scores<Decimal>, AnalysisError> {
        let candidates: Vec<Dimension> = countries.iter().map(|c| role.dimension(c)).collect();
        self.value_sums(&candidates, slice)
    }

    /// Import value goes to the destination country, export value to the
    /// origin country.
    pub fn country_breakdown(
        &self,
        import_direction: &str,
        export_direction: &str,
        year: Option<i32>,
    ) -> Result<CountryBreakdown, AnalysisError> {
        let import_slice = Slice::new(Some(import_direction), year);
        let export_slice = Slice::new(Some(export_direction), year);
        self.check_slice(&import_slice)?;
        self.check_slice(&export_slice)?;

        let imports = self.country_values(
            CountryRole::Destination,
            &self.destination_countries(),
            &import_slice,
        )?;
        let exports =
            self.country_values(CountryRole::Origin, &self.origin_countries(), &export_slice)?;
        let total = merge_country_values(&imports, &exports);

        Ok(CountryBreakdown {
            imports,
            exports,
            total,
            import_total: self.total_value(&import_slice),
            export_total: self.total_value(&export_slice),
        })
    }
}

/// `round(metric / total * 100, 2)`, or zero when `total` is zero. Always
/// carries two decimal places.
pub fn percentage(metric: Decimal, total: Decimal) -> Decimal {
    let mut pct = if total.is_zero() {
        Decimal::ZERO
    } else {
        (metric / total * Decimal::ONE_HUNDRED).round_dp(PERCENT_DECIMALS)
    };
    pct.rescale(PERCENT_DECIMALS);
    pct
}

pub fn percentages<V>(scores: &[(String, V)], total: Decimal) -> Scores<Decimal>
where
    V: Copy + Into<Decimal>,
{
    scores
        .iter()
        .map(|(key, value)| (key.clone(), percentage((*value).into(), total)))
        .collect()
}

/// Sum two country maps over the union of their keys.
pub fn merge_country_values(
    imports: &[(String, Decimal)],
    exports: &[(String, Decimal)],
) -> Scores<Decimal> {
    let mut merged: Scores<Decimal> = imports.to_vec();
    for (country, value) in exports {
        match merged.iter_mut().find(|(key, _)| key == country) {
            Some((_, total)) => *total += *value,
            None => merged.push((country.clone(), *value)),
        }
    }
    merged
}
