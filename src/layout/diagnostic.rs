//! Non-fatal signals that accompany a degraded but usable layout result.

use crate::core::task::TaskId;
use crate::layout::moves::ColumnRange;
use crate::rlog_warn;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Diagnostic {
    /// The task sits on a dependency cycle; its minimum column fell back to 0.
    CycleDetected { task_id: TaskId },
    /// A dependency id names no task and was ignored for layering.
    DanglingDependency { task_id: TaskId, dependency: TaskId },
    /// A move request fell outside the task's legal column range.
    MoveRejected {
        task_id: TaskId,
        target_column: usize,
        range: ColumnRange,
    },
    /// A move request named a task that is not in the collection.
    UnknownTask { task_id: TaskId },
}

impl Diagnostic {
    /// The task this diagnostic is about.
    pub fn task_id(&self) -> &TaskId {
        match self {
            Diagnostic::CycleDetected { task_id }
            | Diagnostic::DanglingDependency { task_id, .. }
            | Diagnostic::MoveRejected { task_id, .. }
            | Diagnostic::UnknownTask { task_id } => task_id,
        }
    }

    /// Write the diagnostic to the log at WARN level.
    pub(crate) fn emit(&self) {
        rlog_warn!("{}", self);
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::CycleDetected { task_id } => {
                write!(f, "Circular dependency detected for task {}", task_id)
            }
            Diagnostic::DanglingDependency {
                task_id,
                dependency,
            } => write!(
                f,
                "Task {} depends on unknown task {}, ignoring",
                task_id, dependency
            ),
            Diagnostic::MoveRejected {
                task_id,
                target_column,
                range,
            } => write!(
                f,
                "Cannot move task {} to column {}. Valid range: {}",
                task_id, target_column, range
            ),
            Diagnostic::UnknownTask { task_id } => write!(f, "Unknown task {}", task_id),
        }
    }
}
