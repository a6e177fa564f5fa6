// src/plan/summary.rs

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::config::model::WorkflowFile;

/// Static facts about a workflow, for `validate -v` and `plan` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSummary {
    pub dag_id: String,
    /// The declared description, or the generated default.
    pub description: String,
    pub schedule_interval: Option<String>,
    pub start_date: NaiveDate,
    pub task_count: usize,
    /// Distinct operator names, sorted.
    pub operators: Vec<String>,
    /// Highest task level.
    pub max_depth: usize,
    pub parallel_groups: usize,
    pub has_dependencies: bool,
}

impl WorkflowSummary {
    pub fn from_workflow(workflow: &WorkflowFile) -> Self {
        let graph = workflow.graph();
        let operators: BTreeSet<&str> = workflow
            .tasks
            .iter()
            .map(|t| t.operator.as_str())
            .collect();

        Self {
            dag_id: workflow.dag.dag_id.clone(),
            description: workflow.dag.effective_description(),
            schedule_interval: workflow.dag.schedule_interval.clone(),
            start_date: workflow.dag.start_date,
            task_count: workflow.tasks.len(),
            operators: operators.into_iter().map(str::to_string).collect(),
            max_depth: graph.max_depth(),
            parallel_groups: graph.parallel_groups().len(),
            has_dependencies: graph.has_dependencies(),
        }
    }
}
