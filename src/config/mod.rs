// src/config/mod.rs

//! Workflow specification loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a specification from disk or memory (`loader.rs`).
//! - Shape checks plus dependency resolution (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_config_path, load_and_validate, load_from_path, load_from_str, parse_and_validate,
};
pub use model::{DagSection, DefaultArgs, RawTaskConfig, RawWorkflowFile, TaskSpec, WorkflowFile};
pub use validate::validate_workflow;
