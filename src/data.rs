//! Data loading and feature output

pub mod reader;
pub mod writer;

pub use reader::{read_prices, read_prices_from, REQUIRED_COLUMNS};
pub use writer::{to_records, write_features, write_features_to_path, write_json};
