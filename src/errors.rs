// src/errors.rs

//! Crate-wide error types.
//!
//! [`ResolveError`] is what the dependency resolver reports; every other
//! layer (loader, materializer, CLI) speaks [`FlowdagError`], which wraps it.

use thiserror::Error;

/// Dependency-resolution failures. All of them are fatal to the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Task '{task}' depends on non-existent task '{dependency}'")]
    MissingTask { task: String, dependency: String },

    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    #[error("Duplicate task name: '{name}'")]
    DuplicateTaskName { name: String },
}

impl ResolveError {
    /// The cycle chain, if this is a `CircularDependency`.
    pub fn cycle(&self) -> Option<&[String]> {
        match self {
            ResolveError::CircularDependency { cycle } => Some(cycle),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum FlowdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unsupported operator type: {operator} (supported: {supported})")]
    UnsupportedOperator { operator: String, supported: String },

    #[error("Failed to materialize task '{task}': {reason}")]
    Materialize { task: String, reason: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowdagError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            FlowdagError::Resolve(ResolveError::MissingTask { .. }) => 2,
            FlowdagError::Resolve(ResolveError::CircularDependency { .. }) => 3,
            FlowdagError::Resolve(ResolveError::DuplicateTaskName { .. }) => 4,
            _ => 1,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FlowdagError>;
