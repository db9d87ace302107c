//! Pipeline system for staged feature computation
//!
//! Stages run in three phases: the return stage reshapes the table (dropping
//! the first row), independent indicator groups append columns layer by
//! layer, and the target stage finally reads one row ahead and drops the
//! last row.

pub mod engine;
pub mod graph;
pub mod groups;
pub mod stage;
pub mod stages;

pub use engine::FeaturePipeline;
pub use graph::ExecutionPlan;
pub use groups::{MomentumGroup, TrendGroup, VolatilityGroup, VolumeGroup};
pub use stage::{RowTrim, Stage, StageKind, StageOutput};
pub use stages::{PriceChangeStage, ReturnStage, TargetStage};
