//! Validation and commit of interactive task moves.
//!
//! A task may be placed anywhere from its dependency minimum up to one left
//! of its leftmost dependent. Legality is always judged against the full
//! collection, never a filtered view of it, since filtering can hide the
//! dependents that bound the range.

use crate::core::task::{Task, TaskId};
use crate::layout::columns::Resolution;
use crate::layout::diagnostic::Diagnostic;
use crate::layout::grouping::ColumnGroups;
use crate::rlog;
use chrono::{DateTime, Utc};
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::borrow::Cow;

/// Columns a task may legally occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnRange {
    /// Dependency minimum (inclusive).
    pub min: usize,
    /// Leftmost column holding a dependent (exclusive); `None` when nothing
    /// depends on the task.
    pub ceiling: Option<usize>,
}

impl ColumnRange {
    pub fn new(min: usize, ceiling: Option<usize>) -> Self {
        Self { min, ceiling }
    }

    /// Range for a task without dependents.
    pub fn unbounded(min: usize) -> Self {
        Self { min, ceiling: None }
    }

    /// Inclusive upper bound, `None` when unbounded.
    ///
    /// Check [`ColumnRange::is_empty`] first: a dependent in column 0 leaves
    /// no legal column at all.
    pub fn max(&self) -> Option<usize> {
        self.ceiling.map(|ceiling| ceiling.saturating_sub(1))
    }

    /// No column satisfies both bounds. Only reachable through cycles.
    pub fn is_empty(&self) -> bool {
        self.ceiling.is_some_and(|ceiling| ceiling <= self.min)
    }

    pub fn contains(&self, column: usize) -> bool {
        column >= self.min && self.ceiling.map_or(true, |ceiling| column < ceiling)
    }

    /// The same range with the upper bound clamped to `max_column`.
    pub fn capped(&self, max_column: usize) -> Self {
        let cap = max_column.saturating_add(1);
        Self {
            min: self.min,
            ceiling: Some(self.ceiling.map_or(cap, |ceiling| ceiling.min(cap))),
        }
    }
}

impl std::fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        match self.max() {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}-∞", self.min),
        }
    }
}

/// Result of a move request.
///
/// A rejected move hands back the input collection untouched; an accepted
/// one owns the new collection that replaces it.
#[derive(Debug, Clone)]
pub struct MoveOutcome<'a> {
    pub tasks: Cow<'a, [Task]>,
    pub accepted: bool,
    /// Why the move was rejected.
    pub diagnostic: Option<Diagnostic>,
}

impl<'a> MoveOutcome<'a> {
    fn rejected(tasks: &'a [Task], diagnostic: Diagnostic) -> Self {
        diagnostic.emit();
        Self {
            tasks: Cow::Borrowed(tasks),
            accepted: false,
            diagnostic: Some(diagnostic),
        }
    }

    /// Take the resulting collection, cloning it if the move was rejected.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks.into_owned()
    }
}

impl Resolution<'_> {
    fn range_of(&self, node: NodeIndex) -> ColumnRange {
        let ceiling = self
            .graph
            .dependents(node)
            .map(|dependent| self.effective[dependent.index()])
            .min();
        ColumnRange::new(self.minimums[node.index()], ceiling)
    }

    /// Highest column any task is drawn in.
    fn max_rendered_column(&self) -> usize {
        self.effective.iter().copied().max().unwrap_or(0)
    }
}

/// Legal columns for a task, or `None` if the id is unknown.
pub fn column_range(tasks: &[Task], task_id: &TaskId) -> Option<ColumnRange> {
    let resolution = Resolution::new(tasks);
    let node = resolution.graph.node(task_id)?;
    Some(resolution.range_of(node))
}

/// Validate a move and, if legal, produce the updated collection.
///
/// See [`validate_and_apply_move_at`]; the commit is stamped with the
/// current time.
pub fn validate_and_apply_move<'a>(
    tasks: &'a [Task],
    task_id: &TaskId,
    target_column: usize,
    target_index: usize,
) -> MoveOutcome<'a> {
    validate_and_apply_move_at(tasks, task_id, target_column, target_index, Utc::now())
}

/// Validate a move and, if legal, produce the updated collection.
///
/// On acceptance the moved task is pinned to `target_column` at
/// `target_index`, and every other task already in the target column whose
/// manual order is at or after the slot shifts down by one. Tasks ordered
/// only by status and priority are left alone, so they may interleave with
/// the inserted task.
pub fn validate_and_apply_move_at<'a>(
    tasks: &'a [Task],
    task_id: &TaskId,
    target_column: usize,
    target_index: usize,
    now: DateTime<Utc>,
) -> MoveOutcome<'a> {
    let resolution = Resolution::new(tasks);

    let Some(node) = resolution.graph.node(task_id) else {
        return MoveOutcome::rejected(
            tasks,
            Diagnostic::UnknownTask {
                task_id: task_id.clone(),
            },
        );
    };

    let range = resolution.range_of(node);
    if !range.contains(target_column) {
        return MoveOutcome::rejected(
            tasks,
            Diagnostic::MoveRejected {
                task_id: task_id.clone(),
                target_column,
                range,
            },
        );
    }

    let updated: Vec<Task> = tasks
        .iter()
        .zip(&resolution.effective)
        .map(|(task, &column)| {
            let mut task = task.clone();
            if &task.id == task_id {
                task.manual_column = Some(target_column);
                task.manual_order = Some(target_index);
                task.updated_at = now;
            } else if column == target_column {
                if let Some(order) = task.manual_order.filter(|&order| order >= target_index) {
                    task.manual_order = Some(order.saturating_add(1));
                }
            }
            task
        })
        .collect();

    rlog!(
        "Moved task {} to column {} at index {}",
        task_id,
        target_column,
        target_index
    );

    MoveOutcome {
        tasks: Cow::Owned(updated),
        accepted: true,
        diagnostic: None,
    }
}

/// Where a dragged task would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropTarget {
    pub column: usize,
    pub index: usize,
    pub is_valid: bool,
}

/// A column as shown while a drag is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSlot {
    pub column: usize,
    pub task_ids: Vec<TaskId>,
    /// The dragged task may be dropped here.
    pub is_valid: bool,
}

/// Drag state captured when a drag starts.
///
/// The legal range is computed once from the full collection and stays
/// fixed until the drag ends; it allows at most one new column right of the
/// last rendered one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    task_id: TaskId,
    range: ColumnRange,
    max_rendered_column: usize,
}

impl DragSession {
    /// Start dragging `task_id`, or `None` if the task is unknown.
    ///
    /// `max_rendered_column` is the last column currently drawn; pass `None`
    /// to use the highest column of the full collection.
    pub fn begin(
        tasks: &[Task],
        task_id: &TaskId,
        max_rendered_column: Option<usize>,
    ) -> Option<Self> {
        let resolution = Resolution::new(tasks);
        let node = resolution.graph.node(task_id)?;
        let max_rendered_column =
            max_rendered_column.unwrap_or_else(|| resolution.max_rendered_column());
        let range = resolution
            .range_of(node)
            .capped(max_rendered_column.saturating_add(1));

        Some(Self {
            task_id: task_id.clone(),
            range,
            max_rendered_column,
        })
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Legal range for this drag, already clamped to one trailing column.
    pub fn range(&self) -> ColumnRange {
        self.range
    }

    pub fn max_rendered_column(&self) -> usize {
        self.max_rendered_column
    }

    pub fn accepts(&self, column: usize) -> bool {
        self.range.contains(column)
    }

    pub fn drop_target(&self, column: usize, index: usize) -> DropTarget {
        DropTarget {
            column,
            index,
            is_valid: self.accepts(column),
        }
    }

    /// Target for dropping past the last rendered column, if that new column
    /// is legal.
    pub fn trailing_target(&self) -> Option<DropTarget> {
        let column = self.max_rendered_column.saturating_add(1);
        self.accepts(column).then_some(DropTarget {
            column,
            index: 0,
            is_valid: true,
        })
    }

    /// Columns to show during the drag.
    ///
    /// Occupied columns are always shown; empty ones only when the task may
    /// be dropped there.
    pub fn visible_columns(&self, groups: &ColumnGroups) -> Vec<ColumnSlot> {
        let last = match self.range.max() {
            Some(max) if !self.range.is_empty() => self.max_rendered_column.max(max),
            _ => self.max_rendered_column,
        }
        .max(groups.max_column());

        (0..=last)
            .filter_map(|column| {
                let task_ids = groups.column(column);
                let is_valid = self.accepts(column);
                (is_valid || !task_ids.is_empty()).then(|| ColumnSlot {
                    column,
                    task_ids: task_ids.to_vec(),
                    is_valid,
                })
            })
            .collect()
    }

    /// Commit the drop. Invalid targets are rejected without re-validating.
    pub fn commit<'a>(&self, tasks: &'a [Task], target: DropTarget) -> MoveOutcome<'a> {
        if !target.is_valid || !self.accepts(target.column) {
            return MoveOutcome::rejected(
                tasks,
                Diagnostic::MoveRejected {
                    task_id: self.task_id.clone(),
                    target_column: target.column,
                    range: self.range,
                },
            );
        }
        validate_and_apply_move(tasks, &self.task_id, target.column, target.index)
    }
}
