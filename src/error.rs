//! Error types for the feature engine

use thiserror::Error;

/// Main error type for feature computation
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Insufficient history for {stage}: requires {required} rows, got {available}")]
    InsufficientHistory {
        stage: String,
        required: usize,
        available: usize,
    },

    #[error("Column collision: {0} already exists")]
    ColumnCollision(String),

    #[error("Missing dependency: stage {stage} requires column {column}")]
    MissingDependency { stage: String, column: String },

    #[error("Dependency cycle between stages: {0}")]
    DependencyCycle(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl FeatureError {
    /// Shorthand for a missing column
    pub fn missing_column(name: &str) -> Self {
        FeatureError::Schema(format!("missing column '{}'", name))
    }

    pub fn insufficient(stage: &str, required: usize, available: usize) -> Self {
        FeatureError::InsufficientHistory {
            stage: stage.to_string(),
            required,
            available,
        }
    }
}

/// Result type alias for feature engine operations
pub type Result<T> = std::result::Result<T, FeatureError>;
