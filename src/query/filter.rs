use crate::dataset::{Column, Dataset};
use crate::query::criteria::{Criterion, FilterCriteria};
use crate::transaction::Transaction;

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use std::fmt;

/// Format required for `start_date` / `end_date` criteria.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Value never observed in the column.
    UnknownValue,
    /// Year outside `[min, max_exclusive)`.
    YearOutOfRange { min: Option<i32>, max_exclusive: i32 },
    /// Date not in `DD/MM/YYYY` form.
    InvalidDate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownValue => write!(f, "not a value of this column"),
            SkipReason::YearOutOfRange {
                min: Some(min),
                max_exclusive,
            } => write!(f, "year outside {min}..{max_exclusive}"),
            SkipReason::YearOutOfRange { min: None, .. } => write!(f, "dataset has no years"),
            SkipReason::InvalidDate => write!(f, "date must use the DD/MM/YYYY format"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCriterion {
    pub criterion: Criterion,
    pub reason: SkipReason,
}

/// Rows that passed every applied criterion, plus what was applied or skipped.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    pub rows: Vec<&'a Transaction>,
    pub applied: Vec<Criterion>,
    pub skipped: Vec<SkippedCriterion>,
}

impl<'a> FilterOutcome<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_value(&self) -> Decimal {
        self.rows.iter().map(|tx| tx.total_value).sum()
    }
}

/// Predicates that survived validation.
#[derive(Default)]
struct ActivePredicates {
    categories: Vec<(Column, String)>,
    start_year: Option<i32>,
    end_year: Option<i32>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    min_value: Option<Decimal>,
    max_value: Option<Decimal>,
}

impl ActivePredicates {
    fn matches(&self, tx: &Transaction) -> bool {
        self.categories
            .iter()
            .all(|(column, value)| column.value_of(tx) == value.as_str())
            && self.start_year.map_or(true, |year| tx.year >= year)
            && self.end_year.map_or(true, |year| tx.year <= year)
            && self.start_date.map_or(true, |date| tx.date >= date)
            && self.end_date.map_or(true, |date| tx.date <= date)
            && self.min_value.map_or(true, |value| tx.total_value >= value)
            && self.max_value.map_or(true, |value| tx.total_value <= value)
    }
}

/// Row filter over a borrowed, read-only dataset.
///
/// Categorical values are validated against the unfiltered dataset, years
/// against `[min year, current year)`, dates against [`DATE_FORMAT`]. A
/// criterion that fails validation is skipped and logged rather than
/// narrowing the result.
#[derive(Debug, Clone, Copy)]
pub struct Filter<'a> {
    dataset: &'a Dataset,
    current_year: i32,
}

impl<'a> Filter<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self::with_current_year(dataset, Local::now().year())
    }

    pub fn with_current_year(dataset: &'a Dataset, current_year: i32) -> Self {
        Self {
            dataset,
            current_year,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn apply(&self, criteria: &FilterCriteria) -> FilterOutcome<'a> {
        let mut active = ActivePredicates::default();
        let mut applied = Vec::new();
        let mut skipped = Vec::new();

        let mut record = |criterion: Criterion, reason: Option<SkipReason>| match reason {
            None => applied.push(criterion),
            Some(reason) => {
                log::warn!("Skipping filter {criterion}: {reason}");
                skipped.push(SkippedCriterion { criterion, reason });
            }
        };

        for (column, value) in criteria.categorical() {
            let criterion = Criterion::Category {
                column,
                value: value.to_string(),
            };
            if self.dataset.contains_value(column, value) {
                active.categories.push((column, value.to_string()));
                record(criterion, None);
            } else {
                record(criterion, Some(SkipReason::UnknownValue));
            }
        }

        if let Some(year) = criteria.start_year {
            let reason = self.check_year(year);
            if reason.is_none() {
                active.start_year = Some(year);
            }
            record(Criterion::StartYear(year), reason);
        }
        if let Some(year) = criteria.end_year {
            let reason = self.check_year(year);
            if reason.is_none() {
                active.end_year = Some(year);
            }
            record(Criterion::EndYear(year), reason);
        }

        if let Some(raw) = &criteria.start_date {
            let parsed = parse_filter_date(raw);
            active.start_date = parsed;
            record(
                Criterion::StartDate(raw.clone()),
                parsed.is_none().then_some(SkipReason::InvalidDate),
            );
        }
        if let Some(raw) = &criteria.end_date {
            let parsed = parse_filter_date(raw);
            active.end_date = parsed;
            record(
                Criterion::EndDate(raw.clone()),
                parsed.is_none().then_some(SkipReason::InvalidDate),
            );
        }

        if let Some(value) = criteria.min_value {
            active.min_value = Some(value);
            record(Criterion::MinValue(value), None);
        }
        if let Some(value) = criteria.max_value {
            active.max_value = Some(value);
            record(Criterion::MaxValue(value), None);
        }

        let rows = self
            .dataset
            .records()
            .iter()
            .filter(|tx| active.matches(tx))
            .collect();

        FilterOutcome {
            rows,
            applied,
            skipped,
        }
    }

    fn check_year(&self, year: i32) -> Option<SkipReason> {
        let min = self.dataset.min_year();
        let in_range = min.is_some_and(|min| (min..self.current_year).contains(&year));
        (!in_range).then_some(SkipReason::YearOutOfRange {
            min,
            max_exclusive: self.current_year,
        })
    }
}

/// Filter `dataset` by `criteria` using the system clock for year validation.
pub fn filter<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilterOutcome<'a> {
    Filter::new(dataset).apply(criteria)
}

/// `%Y` alone accepts any digit count, so the year part is checked first.
fn parse_filter_date(raw: &str) -> Option<NaiveDate> {
    let year = raw.rsplit('/').next()?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}
