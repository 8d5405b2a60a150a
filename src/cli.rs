//! Command-line front end for inspecting and rearranging a task file.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::core::task::{Task, TaskId};
use crate::layout::{column_range, validate_and_apply_move, Diagnostic, Layout};
use crate::store::TaskFile;
use crate::{rlog, Error, Result};

/// Roadmap - dependency-aware column layout for task graphs
#[derive(Parser, Debug)]
#[command(name = "roadmap")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    ROADMAP_DEBUG=1     Enable debug logging (alternative to --debug)"
)]
pub struct Cli {
    /// Enable debug logging (writes to ~/.roadmap/roadmap.log)
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Task file to read (defaults to `tasks_file` from the config)
    #[arg(short = 'f', long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print every column with its tasks in display order
    Columns {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print dependency edges between placed tasks
    Edges {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the columns a task may be moved to
    Range {
        /// Task ID
        task: String,
    },

    /// Move a task to a column and position
    Move {
        /// Task ID
        task: String,

        /// Target column (0-based)
        column: usize,

        /// Position within the column (0 = top)
        index: usize,

        /// Validate only, do not write the task file
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    /// Task file named on the command line, else the configured one.
    pub fn tasks_path(&self, config: &Config) -> Result<PathBuf> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => config.tasks_path(),
        }
    }
}

/// Execute a parsed command, writing its report to `out`.
pub fn run(cli: &Cli, config: &Config, out: &mut impl Write) -> Result<()> {
    let path = cli.tasks_path(config)?;
    let file = TaskFile::load(&path)?;
    rlog!(
        "roadmap {:?} on {} ({} tasks)",
        cli.command,
        path.display(),
        file.tasks.len()
    );

    match &cli.command {
        Command::Columns { json } => print_columns(&file.tasks, *json, out),
        Command::Edges { json } => print_edges(&file.tasks, *json, out),
        Command::Range { task } => print_range(&file.tasks, &TaskId::from(task.as_str()), out),
        Command::Move {
            task,
            column,
            index,
            dry_run,
        } => {
            let task_id = TaskId::from(task.as_str());
            let outcome = validate_and_apply_move(&file.tasks, &task_id, *column, *index);

            if let Some(diagnostic) = &outcome.diagnostic {
                return Err(match diagnostic {
                    Diagnostic::UnknownTask { .. } => Error::TaskNotFound(task_id.to_string()),
                    other => Error::MoveRejected {
                        task: task_id.to_string(),
                        message: other.to_string(),
                    },
                });
            }

            writeln!(out, "Moved {} to column {} at position {}", task_id, column, index)?;

            if *dry_run || !config.write_back {
                writeln!(out, "Dry run: {} not modified", path.display())?;
                return Ok(());
            }

            TaskFile::new(outcome.into_tasks()).save(&path)?;
            writeln!(out, "Saved {}", path.display())?;
            Ok(())
        }
    }
}

fn print_columns(tasks: &[Task], json: bool, out: &mut impl Write) -> Result<()> {
    let layout = Layout::compute(tasks);

    if json {
        let output = serde_json::json!({
            "columns": layout.groups,
            "max_column": layout.max_column,
            "diagnostics": layout.diagnostics,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    let by_id = index_tasks(tasks);
    for (column, ids) in layout.groups.iter() {
        writeln!(out, "Column {}", column)?;
        for id in ids {
            match by_id.get(id) {
                Some(task) => writeln!(
                    out,
                    "  {:<12} {:<10} {}",
                    id.as_str(),
                    task.status.to_string(),
                    task.title
                )?,
                None => writeln!(out, "  {}", id)?,
            }
        }
    }
    print_diagnostics(&layout.diagnostics, out)
}

fn print_edges(tasks: &[Task], json: bool, out: &mut impl Write) -> Result<()> {
    let layout = Layout::compute(tasks);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&layout.edges)?)?;
        return Ok(());
    }

    for edge in &layout.edges {
        let marker = if edge.from_completed { " (done)" } else { "" };
        writeln!(
            out,
            "{} [{}] -> {} [{}]{}",
            edge.from_task_id, edge.from_column, edge.to_task_id, edge.to_column, marker
        )?;
    }
    print_diagnostics(&layout.diagnostics, out)
}

fn print_range(tasks: &[Task], task_id: &TaskId, out: &mut impl Write) -> Result<()> {
    let range =
        column_range(tasks, task_id).ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
    let layout = Layout::compute(tasks);
    let column = layout.column_of(task_id).unwrap_or_default();

    writeln!(out, "Task {} is in column {}", task_id, column)?;
    writeln!(out, "Legal columns: {}", range)?;
    if let Some(drag) = layout.begin_drag(tasks, task_id) {
        writeln!(out, "Drag columns:  {}", drag.range())?;
    }
    Ok(())
}

fn print_diagnostics(diagnostics: &[Diagnostic], out: &mut impl Write) -> Result<()> {
    for diagnostic in diagnostics {
        writeln!(out, "warning: {}", diagnostic)?;
    }
    Ok(())
}

fn index_tasks(tasks: &[Task]) -> HashMap<&TaskId, &Task> {
    let mut by_id = HashMap::new();
    for task in tasks {
        by_id.entry(&task.id).or_insert(task);
    }
    by_id
}
