//! Stage abstraction for the feature pipeline

use crate::error::Result;
use crate::table::FeatureTable;

/// Scheduling class of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Changes the row set for everything downstream; runs first, alone
    Reshape,
    /// Appends row-aligned columns; independent stages may run in parallel
    Features,
    /// Reads future rows to build labels; runs after every feature stage
    Label,
}

/// Rows a stage removes once its columns are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowTrim {
    #[default]
    None,
    Leading(usize),
    Trailing(usize),
}

/// Columns computed by one stage
#[derive(Debug, Clone, Default)]
pub struct StageOutput {
    pub columns: Vec<(String, Vec<f64>)>,
    pub trim: RowTrim,
}

impl StageOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column
    pub fn with(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), values));
        self
    }

    pub fn trimmed(mut self, trim: RowTrim) -> Self {
        self.trim = trim;
        self
    }
}

/// One unit of feature computation.
///
/// A stage declares the columns it reads and the columns it writes; the
/// pipeline uses those declarations to order stages and to reject plans
/// with missing inputs or overlapping outputs before any row is touched.
/// Stages carry no mutable state, so one pipeline can be run on many
/// tables, including concurrently.
pub trait Stage: Send + Sync {
    /// Stage name used in logs and errors
    fn name(&self) -> &str;

    fn kind(&self) -> StageKind {
        StageKind::Features
    }

    /// Columns this stage reads
    fn requires(&self) -> Vec<String>;

    /// Columns this stage appends
    fn produces(&self) -> Vec<String>;

    /// Compute the stage's columns from a read-only view of the table
    fn compute(&self, table: &FeatureTable) -> Result<StageOutput>;
}

/// `Vec<String>` from string literals
pub(crate) fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
