//! Stage dependency graph
//!
//! Resolves declared column dependencies into an execution plan: a list of
//! layers, where every stage in a layer only reads columns produced by
//! earlier layers (or base columns) and stages within a layer write
//! disjoint columns.

use crate::error::{FeatureError, Result};
use crate::pipeline::stage::{Stage, StageKind};
use crate::types::BASE_COLUMNS;
use hashbrown::HashMap;
use std::collections::VecDeque;

/// Ordered layers of stage indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    layers: Vec<Vec<usize>>,
}

impl ExecutionPlan {
    /// Validate the stages and compute their execution order.
    ///
    /// Reshape stages run first and Label stages last, each alone in its
    /// layer. Feature stages are grouped into layers by Kahn's algorithm.
    pub fn build(stages: &[Box<dyn Stage>]) -> Result<Self> {
        let producers = producer_index(stages)?;
        let dependencies = resolve_dependencies(stages, &producers)?;

        let mut layers = Vec::new();
        for kind in [StageKind::Reshape, StageKind::Features, StageKind::Label] {
            let members: Vec<usize> = (0..stages.len())
                .filter(|&i| stages[i].kind() == kind)
                .collect();
            let kind_layers = layer_by_dependencies(stages, &members, &dependencies)?;

            if kind == StageKind::Features {
                layers.extend(kind_layers);
            } else {
                layers.extend(kind_layers.into_iter().flatten().map(|i| vec![i]));
            }
        }

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Vec<usize>] {
        &self.layers
    }

    /// Stage indices in execution order
    pub fn order(&self) -> impl Iterator<Item = usize> + '_ {
        self.layers.iter().flatten().copied()
    }
}

fn phase(kind: StageKind) -> u8 {
    match kind {
        StageKind::Reshape => 0,
        StageKind::Features => 1,
        StageKind::Label => 2,
    }
}

/// Map every produced column to its single producing stage
fn producer_index(stages: &[Box<dyn Stage>]) -> Result<HashMap<String, usize>> {
    let mut producers = HashMap::new();
    for (i, stage) in stages.iter().enumerate() {
        for column in stage.produces() {
            if BASE_COLUMNS.contains(&column.as_str()) || producers.contains_key(&column) {
                return Err(FeatureError::ColumnCollision(column));
            }
            producers.insert(column, i);
        }
    }
    Ok(producers)
}

/// Producing stages each stage depends on
fn resolve_dependencies(
    stages: &[Box<dyn Stage>],
    producers: &HashMap<String, usize>,
) -> Result<Vec<Vec<usize>>> {
    let mut dependencies = Vec::with_capacity(stages.len());

    for (i, stage) in stages.iter().enumerate() {
        let mut deps = Vec::new();
        for column in stage.requires() {
            if BASE_COLUMNS.contains(&column.as_str()) {
                continue;
            }

            let producer = *producers.get(&column).ok_or_else(|| FeatureError::MissingDependency {
                stage: stage.name().to_string(),
                column: column.clone(),
            })?;

            if producer == i {
                return Err(FeatureError::DependencyCycle(format!(
                    "{} reads its own column {}",
                    stage.name(),
                    column
                )));
            }

            if phase(stages[producer].kind()) > phase(stage.kind()) {
                return Err(FeatureError::DependencyCycle(format!(
                    "{} ({:?}) cannot read {} from later stage {} ({:?})",
                    stage.name(),
                    stage.kind(),
                    column,
                    stages[producer].name(),
                    stages[producer].kind()
                )));
            }

            if !deps.contains(&producer) {
                deps.push(producer);
            }
        }
        dependencies.push(deps);
    }

    Ok(dependencies)
}

/// Kahn's algorithm restricted to `members`; dependencies outside the set
/// belong to an earlier phase and are already satisfied.
fn layer_by_dependencies(
    stages: &[Box<dyn Stage>],
    members: &[usize],
    dependencies: &[Vec<usize>],
) -> Result<Vec<Vec<usize>>> {
    let mut in_degree: HashMap<usize, usize> = members
        .iter()
        .map(|&i| {
            let count = dependencies[i].iter().filter(|d| members.contains(*d)).count();
            (i, count)
        })
        .collect();

    let mut ready: VecDeque<usize> = members
        .iter()
        .copied()
        .filter(|i| in_degree[i] == 0)
        .collect();
    let mut layers = Vec::new();
    let mut placed = 0;

    while !ready.is_empty() {
        let mut layer: Vec<usize> = ready.drain(..).collect();
        layer.sort_unstable();

        for &done in &layer {
            for &next in members {
                if dependencies[next].contains(&done) {
                    let degree = in_degree.entry(next).or_insert(0);
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(next);
                    }
                }
            }
        }

        placed += layer.len();
        layers.push(layer);
    }

    if placed != members.len() {
        let stuck: Vec<&str> = members
            .iter()
            .filter(|i| in_degree[*i] > 0)
            .map(|&i| stages[i].name())
            .collect();
        return Err(FeatureError::DependencyCycle(stuck.join(", ")));
    }

    Ok(layers)
}
