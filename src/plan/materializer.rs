// src/plan/materializer.rs

//! Turning validated tasks into concrete units.
//!
//! The materializer is the seam between flowdag and whatever owns task
//! execution. flowdag decides the creation order and which units are wired
//! upstream of which; the [`TaskMaterializer`] decides what a unit is.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::config::model::{TaskSpec, WorkflowFile};
use crate::errors::{FlowdagError, Result};
use crate::types::{Operator, TaskName, TriggerRule};

/// Builds one unit per task and links units to their upstream units.
///
/// Production code uses [`PlanMaterializer`]; tests and embedders can plug
/// in their own unit type.
pub trait TaskMaterializer {
    type Unit;

    /// Create the unit for a single task.
    fn create_unit(&mut self, task: &TaskSpec) -> Result<Self::Unit>;

    /// Attach `upstream` (already created units, named in declaration
    /// order) as predecessors of `unit`.
    fn set_upstream(&mut self, unit: &mut Self::Unit, upstream: &[&str]) -> Result<()>;
}

/// Create and wire every unit of a workflow.
///
/// Units are created in execution order, so every upstream unit exists
/// before anything is attached to it. The result keeps that order.
pub fn materialize<M: TaskMaterializer>(
    workflow: &WorkflowFile,
    materializer: &mut M,
) -> Result<Vec<(TaskName, M::Unit)>> {
    let graph = workflow.graph();
    let specs: HashMap<&str, &TaskSpec> = workflow
        .tasks
        .iter()
        .map(|spec| (spec.name.as_str(), spec))
        .collect();

    let mut units: Vec<(TaskName, M::Unit)> = Vec::with_capacity(specs.len());

    for name in graph.execution_order() {
        let spec = specs
            .get(name.as_str())
            .copied()
            .ok_or_else(|| FlowdagError::Materialize {
                task: name.clone(),
                reason: "task missing from specification".to_string(),
            })?;

        let mut unit = materializer.create_unit(spec)?;

        let upstream = graph.dependencies_of(&name);
        if !upstream.is_empty() {
            debug!(task = %name, upstream = ?upstream, "wiring upstream units");
            materializer.set_upstream(&mut unit, &upstream)?;
        }

        units.push((name, unit));
    }

    Ok(units)
}

/// Unit produced by [`PlanMaterializer`]: a task with its wiring filled in.
#[derive(Debug, Clone)]
pub struct PlannedTask {
    pub name: TaskName,
    pub operator: Operator,
    pub level: usize,
    pub trigger_rule: TriggerRule,
    pub retries: Option<u32>,
    pub retry_delay_minutes: Option<f64>,
    pub pool: Option<String>,
    pub priority_weight: Option<i64>,
    pub queue: Option<String>,
    /// Direct predecessors.
    pub upstream: Vec<TaskName>,
    /// Direct successors.
    pub downstream: Vec<TaskName>,
    /// Operator parameters, passed through untouched.
    pub params: BTreeMap<String, toml::Value>,
}

/// Materializer that builds an in-memory [`PlannedTask`] per task.
///
/// Task-level `retries` / `retry_delay_minutes` fall back to the workflow's
/// `[dag.default_args]`.
#[derive(Debug, Clone)]
pub struct PlanMaterializer {
    levels: BTreeMap<TaskName, usize>,
    dependents: HashMap<TaskName, Vec<TaskName>>,
    default_retries: Option<u32>,
    default_retry_delay_minutes: Option<f64>,
}

impl PlanMaterializer {
    pub fn new(workflow: &WorkflowFile) -> Self {
        let graph = workflow.graph();
        let dependents = graph
            .tasks()
            .map(|name| {
                let names = graph
                    .dependents_of(name)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (name.to_string(), names)
            })
            .collect();

        Self {
            levels: graph.levels(),
            dependents,
            default_retries: workflow.dag.default_args.retries,
            default_retry_delay_minutes: workflow.dag.default_args.retry_delay_minutes,
        }
    }
}

impl TaskMaterializer for PlanMaterializer {
    type Unit = PlannedTask;

    fn create_unit(&mut self, task: &TaskSpec) -> Result<PlannedTask> {
        let level = self
            .levels
            .get(&task.name)
            .copied()
            .ok_or_else(|| FlowdagError::Materialize {
                task: task.name.clone(),
                reason: "task has no level in the resolved graph".to_string(),
            })?;

        Ok(PlannedTask {
            name: task.name.clone(),
            operator: task.operator,
            level,
            trigger_rule: task.trigger_rule,
            retries: task.retries.or(self.default_retries),
            retry_delay_minutes: task.retry_delay_minutes.or(self.default_retry_delay_minutes),
            pool: task.pool.clone(),
            priority_weight: task.priority_weight,
            queue: task.queue.clone(),
            upstream: Vec::new(),
            downstream: self.dependents.get(&task.name).cloned().unwrap_or_default(),
            params: task.params.clone(),
        })
    }

    fn set_upstream(&mut self, unit: &mut PlannedTask, upstream: &[&str]) -> Result<()> {
        for name in upstream {
            if unit.upstream.iter().any(|u| u == name) {
                continue;
            }
            unit.upstream.push((*name).to_string());
        }
        Ok(())
    }
}
