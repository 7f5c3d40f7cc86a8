use crate::error::AnalysisError;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Formats accepted for the `date` column, tried in order.
const DATE_FORMATS: [&str; 3] = ["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d"];

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub register_id: u64,
    pub direction: String,
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub year: i32,
    pub product: String,
    pub transport_mode: String,
    pub company_name: String,
    pub total_value: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CsvTransaction {
    #[serde(alias = "record_id")]
    pub register_id: u64,
    pub direction: String,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub year: Option<i32>,
    pub date: String,
    pub product: String,
    pub transport_mode: String,
    pub company_name: String,
    pub total_value: Decimal,
}

impl TryFrom<CsvTransaction> for Transaction {
    type Error = AnalysisError;

    fn try_from(csv: CsvTransaction) -> Result<Self, Self::Error> {
        let date = parse_record_date(&csv.date).ok_or_else(|| AnalysisError::InvalidRecord {
            register_id: csv.register_id,
            message: format!("unparseable date '{}'", csv.date),
        })?;

        if csv.total_value < Decimal::ZERO {
            return Err(AnalysisError::InvalidRecord {
                register_id: csv.register_id,
                message: format!("negative total_value {}", csv.total_value),
            });
        }

        Ok(Transaction {
            register_id: csv.register_id,
            direction: csv.direction,
            origin: csv.origin,
            destination: csv.destination,
            year: csv.year.unwrap_or_else(|| date.year()),
            date,
            product: csv.product,
            transport_mode: csv.transport_mode,
            company_name: csv.company_name,
            total_value: csv.total_value,
        })
    }
}

fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

impl Transaction {
    #[cfg(test)]
    pub fn new_test(
        register_id: u64,
        direction: &str,
        origin: &str,
        destination: &str,
        year: i32,
        transport_mode: &str,
        total_value: Decimal,
    ) -> Self {
        Self {
            register_id,
            direction: direction.to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            date: NaiveDate::from_ymd_opt(year, 1, 15).unwrap(),
            year,
            product: "Machinery".to_string(),
            transport_mode: transport_mode.to_string(),
            company_name: "Acme".to_string(),
            total_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_row(date: &str, year: Option<i32>, total_value: i64) -> CsvTransaction {
        CsvTransaction {
            register_id: 7,
            direction: "Imports".to_string(),
            origin: "Japan".to_string(),
            destination: "Mexico".to_string(),
            year,
            date: date.to_string(),
            product: "Cars".to_string(),
            transport_mode: "Sea".to_string(),
            company_name: "Honda".to_string(),
            total_value: Decimal::from(total_value),
        }
    }

    #[test]
    fn test_parses_day_first_date() {
        let tx = Transaction::try_from(csv_row("31/01/2015", Some(2015), 10)).unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2015, 1, 31).unwrap());
        assert_eq!(tx.year, 2015);
    }

    #[test]
    fn test_parses_iso_and_short_year_dates() {
        let iso = Transaction::try_from(csv_row("2016-03-02", Some(2016), 10)).unwrap();
        assert_eq!(iso.date, NaiveDate::from_ymd_opt(2016, 3, 2).unwrap());

        let short = Transaction::try_from(csv_row("02/03/17", Some(2017), 10)).unwrap();
        assert_eq!(short.date, NaiveDate::from_ymd_opt(2017, 3, 2).unwrap());
    }

    #[test]
    fn test_year_derived_from_date_when_missing() {
        let tx = Transaction::try_from(csv_row("15/06/2018", None, 10)).unwrap();
        assert_eq!(tx.year, 2018);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let result = Transaction::try_from(csv_row("2015/31/01", Some(2015), 10));
        match result {
            Err(AnalysisError::InvalidRecord { register_id, .. }) => assert_eq!(register_id, 7),
            _ => panic!("Expected InvalidRecord error"),
        }
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let result = Transaction::try_from(csv_row("31/01/2015", Some(2015), -5));
        assert!(matches!(result, Err(AnalysisError::InvalidRecord { .. })));
    }
}
