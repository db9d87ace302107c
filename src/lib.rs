//! # ohlcv_features
//!
//! Technical-analysis feature engine for daily OHLCV price series.
//!
//! A [`PriceTable`](table::PriceTable) goes in; a
//! [`FeatureTable`](table::FeatureTable) comes out carrying returns,
//! trend, momentum, volatility and volume indicators plus the next-day
//! return label `y`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ohlcv_features::prelude::*;
//!
//! # fn main() -> ohlcv_features::error::Result<()> {
//! let prices = ohlcv_features::data::read_prices("prices.csv")?;
//! let pipeline = FeaturePipeline::standard(&FeatureConfig::default())?;
//! let features = pipeline.run(&prices)?;
//! println!("{} rows, rsi = {:?}", features.len(), features.value("rsi", 20));
//! # Ok(())
//! # }
//! ```
//!
//! Two stages read the future and are labelled as such: the target `y`
//! (next row's return) and the true range behind `atr` (next row's close).

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod pipeline;
pub mod table;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::FeatureConfig;
    pub use crate::error::{FeatureError, Result};
    pub use crate::pipeline::{FeaturePipeline, Stage, StageKind, StageOutput};
    pub use crate::table::{FeatureTable, PriceTable};
    pub use crate::types::*;
}
