// src/plan/mod.rs

//! Execution plans built from a validated workflow.
//!
//! - [`materializer`] defines the [`TaskMaterializer`] seam and the
//!   built-in [`PlanMaterializer`].
//! - [`summary`] gathers headline numbers for CLI output.

pub mod materializer;
pub mod summary;

pub use materializer::{PlanMaterializer, PlannedTask, TaskMaterializer, materialize};
pub use summary::WorkflowSummary;

use tracing::info;

use crate::config::model::WorkflowFile;
use crate::errors::Result;
use crate::types::TaskName;

/// Every task wired to its neighbours, in execution order, together with
/// the groups of tasks that may run side by side.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub dag_id: String,
    /// Planned tasks in execution order.
    pub tasks: Vec<PlannedTask>,
    pub groups: Vec<Vec<TaskName>>,
}

impl ExecutionPlan {
    pub fn build(workflow: &WorkflowFile) -> Result<Self> {
        let mut materializer = PlanMaterializer::new(workflow);
        let tasks: Vec<PlannedTask> = materialize(workflow, &mut materializer)?
            .into_iter()
            .map(|(_, unit)| unit)
            .collect();
        let groups = workflow.graph().parallel_groups();

        info!(
            dag_id = %workflow.dag_id(),
            tasks = tasks.len(),
            groups = groups.len(),
            "execution plan built"
        );

        Ok(Self {
            dag_id: workflow.dag_id().to_string(),
            tasks,
            groups,
        })
    }

    pub fn task(&self, name: &str) -> Option<&PlannedTask> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Task names in execution order.
    pub fn order(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }
}
