// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod plan;
pub mod types;

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::model::WorkflowFile;
use crate::errors::Result;
use crate::plan::{ExecutionPlan, WorkflowSummary};
use crate::types::Operator;

/// High-level entry point used by `main.rs`.
///
/// Dispatches the subcommand and writes its report to stdout.
pub fn run(args: CliArgs) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Validate { file, verbose } => {
            let path = spec_path(file);
            validate(&path, verbose, &mut out)
        }
        Command::Plan { file } => {
            let path = spec_path(file);
            plan(&path, &mut out)
        }
        Command::Operators => list_operators(&mut out),
    }
}

fn spec_path(file: Option<PathBuf>) -> PathBuf {
    file.unwrap_or_else(default_config_path)
}

/// `flowdag validate`: load, validate and optionally summarise.
pub fn validate(path: &Path, verbose: bool, out: &mut impl Write) -> Result<()> {
    info!(path = %path.display(), "validating workflow specification");
    let workflow = load_and_validate(path)?;

    writeln!(out, "✓ specification is valid")?;

    if verbose {
        let summary = WorkflowSummary::from_workflow(&workflow);
        writeln!(out)?;
        writeln!(out, "Validation summary:")?;
        write_summary(&summary, out)?;
    }

    Ok(())
}

/// `flowdag plan`: print summary, execution order, groups and wiring.
pub fn plan(path: &Path, out: &mut impl Write) -> Result<()> {
    let workflow = load_and_validate(path)?;
    write_plan(&workflow, out)
}

/// Render the full plan report for an already validated workflow.
pub fn write_plan(workflow: &WorkflowFile, out: &mut impl Write) -> Result<()> {
    let summary = WorkflowSummary::from_workflow(workflow);
    let plan = ExecutionPlan::build(workflow)?;

    writeln!(out, "flowdag plan")?;
    write_summary(&summary, out)?;
    writeln!(out)?;

    writeln!(out, "execution order ({}):", plan.tasks.len())?;
    for (i, name) in plan.order().iter().enumerate() {
        writeln!(out, "  {:>3}. {name}", i + 1)?;
    }
    writeln!(out)?;

    writeln!(out, "parallel groups ({}):", plan.groups.len())?;
    for (level, group) in plan.groups.iter().enumerate() {
        writeln!(out, "  level {level}: {}", group.join(", "))?;
    }
    writeln!(out)?;

    writeln!(out, "tasks:")?;
    for task in &plan.tasks {
        writeln!(out, "  - {} ({})", task.name, task.operator)?;
        if !task.upstream.is_empty() {
            writeln!(out, "      upstream: {:?}", task.upstream)?;
        }
        if !task.downstream.is_empty() {
            writeln!(out, "      downstream: {:?}", task.downstream)?;
        }
        if !task.params.is_empty() {
            let keys: Vec<&str> = task.params.keys().map(String::as_str).collect();
            writeln!(out, "      params: {:?}", keys)?;
        }
    }

    debug!("plan complete (no execution)");
    Ok(())
}

/// `flowdag operators`.
pub fn list_operators(out: &mut impl Write) -> Result<()> {
    let mut names: Vec<&str> = Operator::ALL.iter().map(Operator::as_str).collect();
    names.sort_unstable();

    writeln!(out, "Supported operators:")?;
    writeln!(out, "{}", "=".repeat(30))?;
    for name in &names {
        writeln!(out, "  • {name}")?;
    }
    writeln!(out)?;
    writeln!(out, "Total: {} operators supported", names.len())?;
    Ok(())
}

fn write_summary(summary: &WorkflowSummary, out: &mut impl Write) -> Result<()> {
    writeln!(out, "  dag_id: {}", summary.dag_id)?;
    writeln!(out, "  description: {}", summary.description)?;
    writeln!(
        out,
        "  schedule: {}",
        summary.schedule_interval.as_deref().unwrap_or("none")
    )?;
    writeln!(out, "  start_date: {}", summary.start_date)?;
    writeln!(out, "  task_count: {}", summary.task_count)?;
    writeln!(out, "  operators: {}", summary.operators.join(", "))?;
    writeln!(out, "  max_depth: {}", summary.max_depth)?;
    writeln!(out, "  parallel_groups: {}", summary.parallel_groups)?;
    writeln!(out, "  has_dependencies: {}", summary.has_dependencies)?;
    Ok(())
}
