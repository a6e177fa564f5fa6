// src/types.rs

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

pub type TaskName = String;

/// `depends_on` as written in a specification: a single name or a list.
///
/// An absent field is modelled as `Option<DependsOn>` by the caller. The
/// resolver never sees this type, only the normalized `Vec<TaskName>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DependsOn {
    One(TaskName),
    Many(Vec<TaskName>),
}

impl DependsOn {
    /// Normalize into an ordered list, keeping the first occurrence of any
    /// name listed more than once.
    pub fn into_vec(self) -> Vec<TaskName> {
        match self {
            DependsOn::One(name) => vec![name],
            DependsOn::Many(names) => {
                let mut seen: HashSet<TaskName> = HashSet::with_capacity(names.len());
                let mut out: Vec<TaskName> = Vec::with_capacity(names.len());
                for name in names {
                    if !seen.insert(name.clone()) {
                        warn!(dependency = %name, "dependency listed more than once; ignoring repeat");
                        continue;
                    }
                    out.push(name);
                }
                out
            }
        }
    }

    /// Normalize an optional `depends_on`; absent means no dependencies.
    pub fn normalize(depends_on: Option<DependsOn>) -> Vec<TaskName> {
        depends_on.map(DependsOn::into_vec).unwrap_or_default()
    }
}

impl From<&str> for DependsOn {
    fn from(name: &str) -> Self {
        DependsOn::One(name.to_string())
    }
}

impl From<Vec<&str>> for DependsOn {
    fn from(names: Vec<&str>) -> Self {
        DependsOn::Many(names.into_iter().map(str::to_string).collect())
    }
}

/// A string that may also be written as a list of strings (e.g. `email`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Operator types a task may name.
///
/// The operator only selects what kind of unit the materializer builds; its
/// parameters stay opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Bash,
    Python,
    Email,
    Dummy,
    BranchPython,
    ShortCircuit,
    FileSensor,
    HttpSensor,
    S3KeySensor,
    SqlSensor,
    ExternalTaskSensor,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::Bash,
        Operator::Python,
        Operator::Email,
        Operator::Dummy,
        Operator::BranchPython,
        Operator::ShortCircuit,
        Operator::FileSensor,
        Operator::HttpSensor,
        Operator::S3KeySensor,
        Operator::SqlSensor,
        Operator::ExternalTaskSensor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Bash => "BashOperator",
            Operator::Python => "PythonOperator",
            Operator::Email => "EmailOperator",
            Operator::Dummy => "DummyOperator",
            Operator::BranchPython => "BranchPythonOperator",
            Operator::ShortCircuit => "ShortCircuitOperator",
            Operator::FileSensor => "FileSensor",
            Operator::HttpSensor => "HttpSensor",
            Operator::S3KeySensor => "S3KeySensor",
            Operator::SqlSensor => "SqlSensor",
            Operator::ExternalTaskSensor => "ExternalTaskSensor",
        }
    }

    /// Comma-separated list of every supported operator name.
    pub fn supported_list() -> String {
        Operator::ALL
            .iter()
            .map(Operator::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s.trim())
            .ok_or_else(|| format!("unsupported operator type: {s}"))
    }
}

/// When a task may start relative to the outcome of its upstream tasks.
///
/// Carried through to the materialized units; never evaluated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerRule {
    AllSuccess,
    AllFailed,
    AllDone,
    OneSuccess,
    OneFailed,
    NoneFailed,
    NoneSkipped,
    Dummy,
}

impl Default for TriggerRule {
    fn default() -> Self {
        TriggerRule::AllSuccess
    }
}
