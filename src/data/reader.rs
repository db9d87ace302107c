//! CSV price loading

use crate::error::{FeatureError, Result};
use crate::table::PriceTable;
use crate::types::{Date, PriceRow};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Columns a price file must carry
pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Parse `YYYY-MM-DD`, tolerating a trailing time component
fn parse_date(raw: &str) -> Result<Date> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d"))
        .map_err(|e| FeatureError::InvalidInput(format!("bad date '{}': {}", raw, e)))
}

/// Read a price table from a CSV file
pub fn read_prices(path: impl AsRef<Path>) -> Result<PriceTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    log::debug!("Reading prices from {}", path.display());
    read_prices_from(file)
}

/// Read a price table from any CSV source.
///
/// Header order is free and extra columns are ignored. Rows are sorted by
/// date; duplicate dates are rejected.
pub fn read_prices_from<R: Read>(source: R) -> Result<PriceTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(FeatureError::missing_column(column));
        }
    }

    let mut rows = Vec::new();
    for record in reader.deserialize::<CsvRecord>() {
        let record = record?;
        rows.push(PriceRow::new(
            parse_date(&record.date)?,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    log::debug!("Parsed {} price rows", rows.len());
    PriceTable::from_unsorted(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_any_column_order() {
        let data = "volume,close,date,low,high,open,symbol\n\
                    1000,10.5,2024-01-03,9.5,11,10,ABC\n\
                    1200,10.0,2024-01-02,9.0,10.5,9.8,ABC\n";
        let table = read_prices_from(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].close, 10.0);
        assert_eq!(table.rows()[1].volume, 1000.0);
    }

    #[test]
    fn test_missing_close_is_schema_error() {
        let data = "date,open,high,low,volume\n2024-01-02,1,2,0.5,10\n";
        match read_prices_from(data.as_bytes()) {
            Err(FeatureError::Schema(msg)) => assert!(msg.contains("close")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_datetime_dates() {
        assert_eq!(
            parse_date("2024-02-29 00:00:00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("29/02/2024").is_err());
    }
}
