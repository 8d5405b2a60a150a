//! Owner of the active task collection.
//!
//! `Roadmap` is the single writer: layouts are derived on demand from the
//! current collection, and an accepted move replaces the whole collection
//! and bumps the revision. Derived views carry the revision they were
//! computed at so a caller can tell when they are stale.

use crate::core::task::{Task, TaskId};
use crate::layout::{validate_and_apply_move_at, Diagnostic, DragSession, DropTarget, Layout};
use chrono::{DateTime, Utc};

/// A layout tagged with the collection revision it was computed from.
#[derive(Debug, Clone)]
pub struct LayoutSnapshot {
    pub revision: u64,
    pub layout: Layout,
}

/// Outcome of [`Roadmap::apply_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// The collection was replaced; the new revision is attached.
    Applied { revision: u64 },
    /// The collection is unchanged.
    Rejected(Diagnostic),
}

impl MoveResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveResult::Applied { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Roadmap {
    tasks: Vec<Task>,
    revision: u64,
}

impl Roadmap {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks, revision: 0 }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Recompute every derived view from the current collection.
    pub fn layout(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            revision: self.revision,
            layout: Layout::compute(&self.tasks),
        }
    }

    /// Check whether a snapshot still describes the current collection.
    pub fn is_current(&self, snapshot: &LayoutSnapshot) -> bool {
        snapshot.revision == self.revision
    }

    /// Start a drag of `id` against the current collection.
    pub fn begin_drag(&self, id: &TaskId) -> Option<DragSession> {
        DragSession::begin(&self.tasks, id, None)
    }

    pub fn apply_move(
        &mut self,
        id: &TaskId,
        target_column: usize,
        target_index: usize,
    ) -> MoveResult {
        self.apply_move_at(id, target_column, target_index, Utc::now())
    }

    /// Validate and commit a move, replacing the collection on acceptance.
    pub fn apply_move_at(
        &mut self,
        id: &TaskId,
        target_column: usize,
        target_index: usize,
        now: DateTime<Utc>,
    ) -> MoveResult {
        let outcome =
            validate_and_apply_move_at(&self.tasks, id, target_column, target_index, now);

        if !outcome.accepted {
            return MoveResult::Rejected(outcome.diagnostic.unwrap_or(Diagnostic::UnknownTask {
                task_id: id.clone(),
            }));
        }

        let tasks = outcome.into_tasks();
        self.tasks = tasks;
        self.revision += 1;
        MoveResult::Applied {
            revision: self.revision,
        }
    }

    /// Commit the drop of a drag session started on this roadmap.
    pub fn drop_dragged(&mut self, drag: &DragSession, target: DropTarget) -> MoveResult {
        if !target.is_valid || !drag.accepts(target.column) {
            let diagnostic = Diagnostic::MoveRejected {
                task_id: drag.task_id().clone(),
                target_column: target.column,
                range: drag.range(),
            };
            diagnostic.emit();
            return MoveResult::Rejected(diagnostic);
        }
        self.apply_move(drag.task_id(), target.column, target.index)
    }

    /// Replace the collection with one supplied by the external store.
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.revision += 1;
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}
