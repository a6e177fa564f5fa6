// src/config/model.rs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::dag::{ResolvedDag, TaskRecord};
use crate::types::{DependsOn, OneOrMany, Operator, TaskName, TriggerRule};

/// Top-level workflow specification as read from a TOML file.
///
/// ```toml
/// [dag]
/// dag_id = "etl"
/// schedule_interval = "@daily"
///
/// [[tasks]]
/// name = "extract"
/// operator = "BashOperator"
/// bash_command = "echo extract"
///
/// [[tasks]]
/// name = "load"
/// operator = "BashOperator"
/// depends_on = "extract"
/// ```
///
/// This is the unvalidated form; convert it with
/// `WorkflowFile::try_from(raw)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWorkflowFile {
    /// Workflow-level settings from `[dag]`.
    pub dag: DagSection,

    /// Tasks from `[[tasks]]`, in declaration order.
    #[serde(default)]
    pub tasks: Vec<RawTaskConfig>,
}

/// A workflow specification that passed shape checks and dependency
/// resolution.
#[derive(Debug, Clone)]
pub struct WorkflowFile {
    pub dag: DagSection,
    pub tasks: Vec<TaskSpec>,
    graph: ResolvedDag,
}

impl WorkflowFile {
    /// Assemble a validated workflow. Callers must have run validation.
    pub(crate) fn new_unchecked(dag: DagSection, tasks: Vec<TaskSpec>, graph: ResolvedDag) -> Self {
        Self { dag, tasks, graph }
    }

    /// The resolved dependency graph of all tasks.
    pub fn graph(&self) -> &ResolvedDag {
        &self.graph
    }

    pub fn task(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn dag_id(&self) -> &str {
        &self.dag.dag_id
    }
}

/// `[dag]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DagSection {
    /// Unique identifier, `^[a-zA-Z0-9_-]+$`.
    pub dag_id: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Cron expression or preset. Carried through, never evaluated.
    #[serde(default)]
    pub schedule_interval: Option<String>,

    /// `YYYY-MM-DD`, must name a real calendar day.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub catchup: bool,

    #[serde(default = "default_max_active_runs")]
    pub max_active_runs: u32,

    #[serde(default = "default_max_active_tasks")]
    pub max_active_tasks: u32,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub default_args: DefaultArgs,
}

impl DagSection {
    /// The description, or a generated one when none was given.
    pub fn effective_description(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("Workflow generated from TOML: {}", self.dag_id))
    }
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_max_active_runs() -> u32 {
    1
}

fn default_max_active_tasks() -> u32 {
    16
}

/// `[dag.default_args]`: defaults handed to every materialized unit.
///
/// Unknown keys are kept in `extra`.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultArgs {
    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default)]
    pub depends_on_past: Option<bool>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub email_on_failure: Option<bool>,

    #[serde(default)]
    pub email_on_retry: Option<bool>,

    /// A single address or a list of addresses.
    #[serde(default)]
    pub email: Option<OneOrMany>,

    #[serde(default)]
    pub retries: Option<u32>,

    #[serde(default)]
    pub retry_delay_minutes: Option<f64>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl DefaultArgs {
    /// Notification addresses, always as a list.
    pub fn emails(&self) -> Vec<String> {
        self.email.clone().map(OneOrMany::into_vec).unwrap_or_default()
    }
}

impl Default for DefaultArgs {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            depends_on_past: None,
            start_date: None,
            email_on_failure: None,
            email_on_retry: None,
            email: None,
            retries: None,
            retry_delay_minutes: None,
            extra: BTreeMap::new(),
        }
    }
}

fn default_owner() -> String {
    "flowdag".to_string()
}

/// One `[[tasks]]` entry as written.
///
/// Keys not listed here are operator parameters and end up in `params`
/// untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTaskConfig {
    pub name: TaskName,

    /// Operator type name, e.g. `"BashOperator"`.
    pub operator: String,

    /// A single task name or a list of names.
    #[serde(default)]
    pub depends_on: Option<DependsOn>,

    #[serde(default)]
    pub retries: Option<u32>,

    #[serde(default)]
    pub retry_delay_minutes: Option<f64>,

    #[serde(default)]
    pub pool: Option<String>,

    #[serde(default)]
    pub priority_weight: Option<i64>,

    #[serde(default)]
    pub queue: Option<String>,

    #[serde(default)]
    pub trigger_rule: Option<TriggerRule>,

    #[serde(flatten)]
    pub params: BTreeMap<String, toml::Value>,
}

impl RawTaskConfig {
    /// The resolver's view of this task.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            name: self.name.clone(),
            depends_on: DependsOn::normalize(self.depends_on.clone()),
        }
    }
}

/// A validated task: known operator, normalized dependencies.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: TaskName,
    pub operator: Operator,
    pub depends_on: Vec<TaskName>,
    pub retries: Option<u32>,
    pub retry_delay_minutes: Option<f64>,
    pub pool: Option<String>,
    pub priority_weight: Option<i64>,
    pub queue: Option<String>,
    pub trigger_rule: TriggerRule,
    /// Operator-specific parameters, opaque to flowdag.
    pub params: BTreeMap<String, toml::Value>,
}

impl TaskSpec {
    pub(crate) fn from_raw(raw: RawTaskConfig, operator: Operator) -> Self {
        Self {
            depends_on: DependsOn::normalize(raw.depends_on),
            name: raw.name,
            operator,
            retries: raw.retries,
            retry_delay_minutes: raw.retry_delay_minutes,
            pool: raw.pool,
            priority_weight: raw.priority_weight,
            queue: raw.queue,
            trigger_rule: raw.trigger_rule.unwrap_or_default(),
            params: raw.params,
        }
    }
}
