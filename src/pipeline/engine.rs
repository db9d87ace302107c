//! Feature pipeline orchestrator

use crate::config::FeatureConfig;
use crate::error::{FeatureError, Result};
use crate::pipeline::graph::ExecutionPlan;
use crate::pipeline::groups::{MomentumGroup, TrendGroup, VolatilityGroup, VolumeGroup};
use crate::pipeline::stage::{RowTrim, Stage, StageKind, StageOutput};
use crate::pipeline::stages::{PriceChangeStage, ReturnStage, TargetStage};
use crate::table::{FeatureTable, PriceTable};
use crate::types::BASE_COLUMNS;
use rayon::prelude::*;
use std::time::Instant;

/// Ordered set of stages turning a price table into a feature table
pub struct FeaturePipeline {
    stages: Vec<Box<dyn Stage>>,
    plan: ExecutionPlan,
    parallel: bool,
}

impl FeaturePipeline {
    /// Validate stage dependencies and build the execution plan
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Result<Self> {
        let plan = ExecutionPlan::build(&stages)?;
        Ok(Self {
            stages,
            plan,
            parallel: true,
        })
    }

    /// The full returns, indicators and target pipeline
    pub fn standard(config: &FeatureConfig) -> Result<Self> {
        config.validate()?;

        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(ReturnStage),
            Box::new(PriceChangeStage),
            Box::new(TrendGroup::new(config.clone())),
            Box::new(VolatilityGroup::new(config.clone())),
            Box::new(MomentumGroup::new(config.clone())),
            Box::new(VolumeGroup::new(config.clone())),
            Box::new(TargetStage),
        ];

        Ok(Self::new(stages)?.with_parallel(config.parallel))
    }

    /// Toggle running stages of the same layer on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.plan.order().map(|i| self.stages[i].name()).collect()
    }

    /// Every column the pipeline appends, in execution order
    pub fn output_columns(&self) -> Vec<String> {
        self.plan
            .order()
            .flat_map(|i| self.stages[i].produces())
            .collect()
    }

    /// Compute every feature for a price table
    pub fn run(&self, prices: &PriceTable) -> Result<FeatureTable> {
        self.run_table(FeatureTable::from_prices(prices))
    }

    /// Compute every feature on an existing working table
    pub fn run_table(&self, mut table: FeatureTable) -> Result<FeatureTable> {
        self.check_schema(&table)?;

        log::info!(
            "Computing features for {} rows ({} stages in {} layers)",
            table.len(),
            self.stages.len(),
            self.plan.layers().len()
        );
        let started = Instant::now();

        for layer in self.plan.layers() {
            let outputs: Vec<Result<StageOutput>> = if self.parallel && layer.len() > 1 {
                layer
                    .par_iter()
                    .map(|&i| self.compute_stage(i, &table))
                    .collect()
            } else {
                layer
                    .iter()
                    .map(|&i| self.compute_stage(i, &table))
                    .collect()
            };

            let mut trims = Vec::new();
            for (&i, output) in layer.iter().zip(outputs) {
                let output = output?;
                self.merge(i, &mut table, output.columns)?;
                if output.trim != RowTrim::None {
                    trims.push((i, output.trim));
                }
            }

            for (i, trim) in trims {
                let stage = &self.stages[i];
                if stage.kind() == StageKind::Features {
                    return Err(FeatureError::InvalidInput(format!(
                        "feature stage {} cannot drop rows",
                        stage.name()
                    )));
                }
                match trim {
                    RowTrim::Leading(n) => table.trim_leading(n),
                    RowTrim::Trailing(n) => table.trim_trailing(n),
                    RowTrim::None => {}
                }
                log::debug!("Stage {} trimmed rows: {:?}, {} remain", stage.name(), trim, table.len());
            }
        }

        log::info!(
            "Feature table complete: {} rows, {} columns in {:?}",
            table.len(),
            table.column_names().len(),
            started.elapsed()
        );

        Ok(table)
    }

    /// Base columns every stage reads must exist before anything runs
    fn check_schema(&self, table: &FeatureTable) -> Result<()> {
        for stage in &self.stages {
            for column in stage.requires() {
                if BASE_COLUMNS.contains(&column.as_str()) && !table.has_column(&column) {
                    return Err(FeatureError::missing_column(&column));
                }
            }
            for column in stage.produces() {
                if table.has_column(&column) {
                    return Err(FeatureError::ColumnCollision(column));
                }
            }
        }
        Ok(())
    }

    fn compute_stage(&self, index: usize, table: &FeatureTable) -> Result<StageOutput> {
        let stage = &self.stages[index];
        let started = Instant::now();
        let output = stage.compute(table)?;
        log::debug!(
            "Stage {} computed {} columns in {:?}",
            stage.name(),
            output.columns.len(),
            started.elapsed()
        );
        Ok(output)
    }

    fn merge(&self, index: usize, table: &mut FeatureTable, columns: Vec<(String, Vec<f64>)>) -> Result<()> {
        let stage = &self.stages[index];
        let declared = stage.produces();

        for (name, values) in columns {
            if !declared.contains(&name) {
                return Err(FeatureError::Schema(format!(
                    "stage {} produced undeclared column '{}'",
                    stage.name(),
                    name
                )));
            }

            let undefined = values.iter().filter(|v| !v.is_finite()).count();
            if !values.is_empty() && undefined == values.len() {
                log::warn!("Column {} from stage {} is entirely undefined", name, stage.name());
            } else if undefined > 0 {
                log::debug!("Column {} has {} undefined rows", name, undefined);
            }

            table.insert_column(name, values)?;
        }

        Ok(())
    }
}
