//! Core types and constants

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trading date of a daily bar
pub type Date = NaiveDate;

/// Price type (using f64 for precision)
pub type Price = f64;

/// Quantity/volume type
pub type Volume = f64;

/// Names of the base OHLCV columns every table carries
pub const BASE_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// One daily OHLCV observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: Date,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

impl PriceRow {
    /// Create a new row
    pub fn new(date: Date, open: Price, high: Price, low: Price, close: Price, volume: Volume) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check prices are positive and finite and volume is non-negative
    pub fn is_valid(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite() && *p > 0.0)
            && self.volume.is_finite()
            && self.volume >= 0.0
    }

    /// Typical price (high + low + close) / 3
    pub fn typical_price(&self) -> Price {
        (self.high + self.low + self.close) / 3.0
    }
}
