// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawWorkflowFile, WorkflowFile};
use crate::errors::{FlowdagError, Result};

/// Load a specification file and return the raw `RawWorkflowFile`.
///
/// This only performs TOML deserialization; it does **not** check names,
/// operators or dependencies. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawWorkflowFile> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FlowdagError::ConfigError(format!(
            "file not found: {}",
            path.display()
        )));
    }

    debug!(path = %path.display(), "reading workflow specification");
    let contents = fs::read_to_string(path)?;
    load_from_str(&contents)
}

/// Parse specification content held in memory.
pub fn load_from_str(contents: &str) -> Result<RawWorkflowFile> {
    if contents.trim().is_empty() {
        return Err(FlowdagError::ConfigError(
            "empty specification content".to_string(),
        ));
    }

    let raw: RawWorkflowFile = toml::from_str(contents)?;
    Ok(raw)
}

/// Load a specification from path and run full validation.
///
/// This is the entry point the rest of the application uses:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` default functions).
/// - Checks names, operators, dates and limits.
/// - Rejects duplicate task names.
/// - Resolves dependencies (unknown tasks, cycles).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WorkflowFile> {
    let raw = load_from_path(&path)?;
    WorkflowFile::try_from(raw)
}

/// Same as [`load_and_validate`] for in-memory content.
pub fn parse_and_validate(contents: &str) -> Result<WorkflowFile> {
    let raw = load_from_str(contents)?;
    WorkflowFile::try_from(raw)
}

/// Specification path used when none is given on the command line.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Workflow.toml")
}
