//! Price and feature tables
//!
//! A [`PriceTable`] is the immutable, chronologically ordered input. A
//! [`FeatureTable`] is its columnar working copy: the base OHLCV columns plus
//! every derived column appended by the pipeline stages. Rows are addressed
//! purely by position, so every shift and window below assumes row `i` is
//! strictly earlier than row `i + 1`.

use crate::error::{FeatureError, Result};
use crate::types::{Date, PriceRow, BASE_COLUMNS};
use hashbrown::HashMap;

/// Ordered daily OHLCV series, strictly increasing by date
#[derive(Debug, Clone)]
pub struct PriceTable {
    rows: Vec<PriceRow>,
}

impl PriceTable {
    /// Build a table, validating ordering and row values
    pub fn new(rows: Vec<PriceRow>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if !row.is_valid() {
                return Err(FeatureError::InvalidInput(format!(
                    "row {} ({}) has non-positive prices or negative volume",
                    i, row.date
                )));
            }
        }

        if let Some(pair) = rows.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(FeatureError::InvalidInput(format!(
                "dates must be strictly increasing: {} followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self { rows })
    }

    /// Sort by date first, then validate. Duplicate dates are still rejected.
    pub fn from_unsorted(mut rows: Vec<PriceRow>) -> Result<Self> {
        rows.sort_by_key(|r| r.date);
        Self::new(rows)
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last date, if any
    pub fn date_range(&self) -> Option<(Date, Date)> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

/// Columnar table of base and derived values
#[derive(Debug, Clone)]
pub struct FeatureTable {
    dates: Vec<Date>,
    columns: HashMap<String, Vec<f64>>,
    /// Column names in insertion order
    order: Vec<String>,
}

impl FeatureTable {
    /// Columnar copy of a price table with only the base columns
    pub fn from_prices(prices: &PriceTable) -> Self {
        let rows = prices.rows();
        let mut table = Self {
            dates: rows.iter().map(|r| r.date).collect(),
            columns: HashMap::with_capacity(32),
            order: Vec::with_capacity(32),
        };

        let base: [(&str, fn(&PriceRow) -> f64); 5] = [
            ("open", |r: &PriceRow| r.open),
            ("high", |r: &PriceRow| r.high),
            ("low", |r: &PriceRow| r.low),
            ("close", |r: &PriceRow| r.close),
            ("volume", |r: &PriceRow| r.volume),
        ];
        for (name, field) in base {
            table.order.push(name.to_string());
            table
                .columns
                .insert(name.to_string(), rows.iter().map(field).collect());
        }

        table
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Look up a column, failing with a schema error if absent
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .get(name)
            .map(|v| v.as_slice())
            .ok_or_else(|| FeatureError::missing_column(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// All column names in insertion order, base columns first
    pub fn column_names(&self) -> &[String] {
        &self.order
    }

    /// Names of the columns appended on top of the base OHLCV columns
    pub fn derived_columns(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .map(|s| s.as_str())
            .filter(|name| !BASE_COLUMNS.contains(name))
    }

    /// Single cell, `None` if the column or row does not exist
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.columns.get(name).and_then(|c| c.get(row)).copied()
    }

    /// Append a new column. Existing names are never overwritten.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(FeatureError::ColumnCollision(name));
        }

        if values.len() != self.len() {
            return Err(FeatureError::InvalidInput(format!(
                "column '{}' has {} rows, table has {}",
                name,
                values.len(),
                self.len()
            )));
        }

        self.order.push(name.clone());
        self.columns.insert(name, values);
        Ok(())
    }

    /// Drop the first `n` rows from every column
    pub fn trim_leading(&mut self, n: usize) {
        let n = n.min(self.len());
        self.dates.drain(..n);
        for values in self.columns.values_mut() {
            values.drain(..n);
        }
    }

    /// Drop the last `n` rows from every column
    pub fn trim_trailing(&mut self, n: usize) {
        let keep = self.len().saturating_sub(n);
        self.dates.truncate(keep);
        for values in self.columns.values_mut() {
            values.truncate(keep);
        }
    }

    /// Keep only rows where every derived column holds a finite value.
    ///
    /// The engine itself never filters: warm-up prefixes and degenerate
    /// ranges stay undefined in the full table.
    pub fn complete_rows(&self) -> FeatureTable {
        let derived: Vec<&[f64]> = self
            .derived_columns()
            .filter_map(|name| self.columns.get(name).map(|v| v.as_slice()))
            .collect();

        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| derived.iter().all(|col| col[i].is_finite()))
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), keep.iter().map(|&i| values[i]).collect()))
            .collect();

        FeatureTable {
            dates: keep.iter().map(|&i| self.dates[i]).collect(),
            columns,
            order: self.order.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows(n: usize) -> Vec<PriceRow> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                PriceRow::new(start + chrono::Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_rejects_unordered_dates() {
        let mut data = rows(3);
        data.swap(0, 2);
        assert!(matches!(
            PriceTable::new(data.clone()),
            Err(FeatureError::InvalidInput(_))
        ));
        assert_eq!(PriceTable::from_unsorted(data).unwrap().len(), 3);
    }

    #[test]
    fn test_rejects_duplicate_dates() {
        let mut data = rows(3);
        data[1].date = data[0].date;
        assert!(PriceTable::from_unsorted(data).is_err());
    }

    #[test]
    fn test_base_columns() {
        let table = FeatureTable::from_prices(&PriceTable::new(rows(4)).unwrap());
        assert_eq!(table.len(), 4);
        assert_eq!(table.column("close").unwrap()[3], 103.0);
        assert_eq!(table.derived_columns().count(), 0);
        assert!(matches!(table.column("rsi"), Err(FeatureError::Schema(_))));
    }

    #[test]
    fn test_insert_collision_and_length() {
        let mut table = FeatureTable::from_prices(&PriceTable::new(rows(3)).unwrap());
        table.insert_column("x", vec![1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            table.insert_column("x", vec![0.0; 3]),
            Err(FeatureError::ColumnCollision(_))
        ));
        assert!(matches!(
            table.insert_column("y", vec![0.0; 2]),
            Err(FeatureError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_trim() {
        let mut table = FeatureTable::from_prices(&PriceTable::new(rows(5)).unwrap());
        table.trim_leading(1);
        table.trim_trailing(2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("close").unwrap(), &[101.0, 102.0]);
    }

    #[test]
    fn test_complete_rows() {
        let mut table = FeatureTable::from_prices(&PriceTable::new(rows(4)).unwrap());
        table
            .insert_column("f", vec![f64::NAN, 1.0, f64::INFINITY, 2.0])
            .unwrap();
        let complete = table.complete_rows();
        assert_eq!(complete.len(), 2);
        assert_eq!(complete.column("f").unwrap(), &[1.0, 2.0]);
        assert_eq!(complete.column("close").unwrap(), &[101.0, 103.0]);
    }
}
