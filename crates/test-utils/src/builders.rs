#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::NaiveDate;

use flowdag::config::{DagSection, DefaultArgs, RawTaskConfig, RawWorkflowFile, WorkflowFile};
use flowdag::dag::TaskRecord;
use flowdag::types::{DependsOn, TriggerRule};

/// Builder for `RawWorkflowFile` / `WorkflowFile` to simplify test setup.
pub struct WorkflowBuilder {
    raw: RawWorkflowFile,
}

impl WorkflowBuilder {
    pub fn new(dag_id: &str) -> Self {
        Self {
            raw: RawWorkflowFile {
                dag: DagSection {
                    dag_id: dag_id.to_string(),
                    description: None,
                    schedule_interval: None,
                    start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
                    end_date: None,
                    catchup: false,
                    max_active_runs: 1,
                    max_active_tasks: 16,
                    tags: Vec::new(),
                    default_args: DefaultArgs::default(),
                },
                tasks: Vec::new(),
            },
        }
    }

    pub fn with_task(mut self, task: RawTaskConfig) -> Self {
        self.raw.tasks.push(task);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.raw.dag.description = Some(description.to_string());
        self
    }

    pub fn schedule(mut self, schedule: &str) -> Self {
        self.raw.dag.schedule_interval = Some(schedule.to_string());
        self
    }

    pub fn default_retries(mut self, retries: u32) -> Self {
        self.raw.dag.default_args.retries = Some(retries);
        self
    }

    pub fn build_raw(self) -> RawWorkflowFile {
        self.raw
    }

    pub fn build(self) -> WorkflowFile {
        WorkflowFile::try_from(self.raw).expect("Failed to build valid workflow from builder")
    }
}

/// Builder for `RawTaskConfig`.
pub struct TaskBuilder {
    task: RawTaskConfig,
}

impl TaskBuilder {
    pub fn new(name: &str, operator: &str) -> Self {
        Self {
            task: RawTaskConfig {
                name: name.to_string(),
                operator: operator.to_string(),
                depends_on: None,
                retries: None,
                retry_delay_minutes: None,
                pool: None,
                priority_weight: None,
                queue: None,
                trigger_rule: None,
                params: BTreeMap::new(),
            },
        }
    }

    /// A `DummyOperator` task.
    pub fn dummy(name: &str) -> Self {
        Self::new(name, "DummyOperator")
    }

    /// Append a dependency, turning `depends_on` into a list.
    pub fn after(mut self, dep: &str) -> Self {
        let mut deps = DependsOn::normalize(self.task.depends_on.take());
        deps.push(dep.to_string());
        self.task.depends_on = Some(DependsOn::Many(deps));
        self
    }

    /// Set `depends_on` exactly as given (single name or list).
    pub fn depends_on(mut self, depends_on: DependsOn) -> Self {
        self.task.depends_on = Some(depends_on);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.task.retries = Some(retries);
        self
    }

    pub fn retry_delay_minutes(mut self, minutes: f64) -> Self {
        self.task.retry_delay_minutes = Some(minutes);
        self
    }

    pub fn trigger_rule(mut self, rule: TriggerRule) -> Self {
        self.task.trigger_rule = Some(rule);
        self
    }

    pub fn param(mut self, key: &str, value: impl Into<toml::Value>) -> Self {
        self.task.params.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> RawTaskConfig {
        self.task
    }
}

/// Shorthand for a list of task records: `records(&[("B", &["A"]), ("A", &[])])`.
pub fn records(tasks: &[(&str, &[&str])]) -> Vec<TaskRecord> {
    tasks
        .iter()
        .map(|(name, deps)| TaskRecord::with_deps(*name, deps.iter().copied()))
        .collect()
}
