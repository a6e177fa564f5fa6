// src/config/validate.rs

use std::collections::HashSet;

use regex::Regex;
use tracing::{debug, info};

use crate::config::model::{DagSection, RawTaskConfig, RawWorkflowFile, TaskSpec, WorkflowFile};
use crate::dag::{TaskRecord, resolve};
use crate::errors::{FlowdagError, ResolveError, Result};
use crate::types::Operator;

const IDENTIFIER_PATTERN: &str = r"^[a-zA-Z0-9_-]+$";

impl TryFrom<RawWorkflowFile> for WorkflowFile {
    type Error = FlowdagError;

    fn try_from(raw: RawWorkflowFile) -> std::result::Result<Self, Self::Error> {
        let patterns = Patterns::compile()?;

        ensure_has_tasks(&raw)?;
        validate_dag_section(&raw.dag, &patterns)?;
        let operators = validate_tasks(&raw.tasks, &patterns)?;
        ensure_unique_names(&raw.tasks)?;

        let records: Vec<TaskRecord> = raw.tasks.iter().map(RawTaskConfig::to_record).collect();
        let graph = resolve(&records)?;

        let tasks: Vec<TaskSpec> = raw
            .tasks
            .into_iter()
            .zip(operators)
            .map(|(task, operator)| TaskSpec::from_raw(task, operator))
            .collect();

        info!(
            dag_id = %raw.dag.dag_id,
            tasks = tasks.len(),
            "workflow specification validated"
        );

        Ok(WorkflowFile::new_unchecked(raw.dag, tasks, graph))
    }
}

/// Whether a raw specification would be accepted, without keeping the
/// error around.
pub fn validate_workflow(raw: &RawWorkflowFile) -> bool {
    match WorkflowFile::try_from(raw.clone()) {
        Ok(_) => true,
        Err(e) => {
            debug!(error = %e, "workflow specification rejected");
            false
        }
    }
}

struct Patterns {
    identifier: Regex,
}

impl Patterns {
    fn compile() -> Result<Self> {
        Ok(Self {
            identifier: Regex::new(IDENTIFIER_PATTERN).map_err(anyhow::Error::from)?,
        })
    }

    fn is_identifier(&self, s: &str) -> bool {
        self.identifier.is_match(s)
    }
}

fn ensure_has_tasks(raw: &RawWorkflowFile) -> Result<()> {
    if raw.tasks.is_empty() {
        return Err(FlowdagError::ConfigError(
            "specification must contain at least one [[tasks]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_dag_section(dag: &DagSection, patterns: &Patterns) -> Result<()> {
    if !patterns.is_identifier(&dag.dag_id) {
        return Err(FlowdagError::ConfigError(format!(
            "[dag].dag_id '{}' must match {IDENTIFIER_PATTERN}",
            dag.dag_id
        )));
    }

    // Calendar validity is checked while parsing; only the range is left.
    if let Some(end) = dag.end_date {
        if end < dag.start_date {
            return Err(FlowdagError::ConfigError(format!(
                "[dag].end_date {end} is before start_date {}",
                dag.start_date
            )));
        }
    }

    if dag.max_active_runs == 0 {
        return Err(FlowdagError::ConfigError(
            "[dag].max_active_runs must be >= 1 (got 0)".to_string(),
        ));
    }
    if dag.max_active_tasks == 0 {
        return Err(FlowdagError::ConfigError(
            "[dag].max_active_tasks must be >= 1 (got 0)".to_string(),
        ));
    }

    if let Some(delay) = dag.default_args.retry_delay_minutes {
        ensure_non_negative_delay("[dag.default_args]", delay)?;
    }

    Ok(())
}

/// Per-task shape checks. Returns the parsed operator of every task, in
/// task order.
fn validate_tasks(tasks: &[RawTaskConfig], patterns: &Patterns) -> Result<Vec<Operator>> {
    let mut operators = Vec::with_capacity(tasks.len());

    for (i, task) in tasks.iter().enumerate() {
        if !patterns.is_identifier(&task.name) {
            return Err(FlowdagError::ConfigError(format!(
                "tasks[{i}].name '{}' must match {IDENTIFIER_PATTERN}",
                task.name
            )));
        }

        let operator = task.operator.parse::<Operator>().map_err(|_| {
            FlowdagError::UnsupportedOperator {
                operator: task.operator.clone(),
                supported: Operator::supported_list(),
            }
        })?;

        if let Some(delay) = task.retry_delay_minutes {
            ensure_non_negative_delay(&format!("task '{}'", task.name), delay)?;
        }

        operators.push(operator);
    }

    Ok(operators)
}

fn ensure_non_negative_delay(owner: &str, delay: f64) -> Result<()> {
    if delay.is_nan() || delay < 0.0 {
        return Err(FlowdagError::ConfigError(format!(
            "{owner}: retry_delay_minutes must be >= 0 (got {delay})"
        )));
    }
    Ok(())
}

fn ensure_unique_names(tasks: &[RawTaskConfig]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.name.as_str()) {
            return Err(ResolveError::DuplicateTaskName {
                name: task.name.clone(),
            }
            .into());
        }
    }
    Ok(())
}
