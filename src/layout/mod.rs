//! Layout and placement engine for the roadmap graph.
//!
//! Every operation takes an explicit task collection snapshot and allocates
//! its own working state, so results can never go stale:
//! - `columns`: dependency minimums and effective columns
//! - `grouping`: per-column partitions in display order
//! - `edges`: dependency edges between placed tasks
//! - `moves`: legal ranges, move validation and drag sessions
//!
//! [`Layout::compute`] runs the whole pipeline in one pass.

pub mod columns;
pub mod diagnostic;
pub mod edges;
pub mod graph;
pub mod grouping;
pub mod moves;

pub use columns::{
    effective_column, min_column, min_columns, resolve_columns, resolve_columns_with_diagnostics,
    ColumnMap,
};
pub use diagnostic::Diagnostic;
pub use edges::{compute_edges, edges_touching, DependencyEdge};
pub use graph::DependencyGraph;
pub use grouping::{compare_within_column, group_by_column, list_order, ColumnGroups};
pub use moves::{
    column_range, validate_and_apply_move, validate_and_apply_move_at, ColumnRange, ColumnSlot,
    DragSession, DropTarget, MoveOutcome,
};

use crate::core::task::{Task, TaskId};
use columns::Resolution;
use serde::Serialize;

/// Every derived view of one collection snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub columns: ColumnMap,
    pub groups: ColumnGroups,
    pub edges: Vec<DependencyEdge>,
    /// Highest occupied column, 0 for an empty collection.
    pub max_column: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Layout {
    pub fn compute(tasks: &[Task]) -> Self {
        let resolution = Resolution::new(tasks);
        let columns = resolution.column_map();
        let groups = group_by_column(tasks, &columns);
        let edges = compute_edges(tasks, &columns);

        Self {
            max_column: groups.max_column(),
            columns,
            groups,
            edges,
            diagnostics: resolution.diagnostics,
        }
    }

    pub fn column_of(&self, id: &TaskId) -> Option<usize> {
        self.columns.get(id)
    }

    /// Start a drag against this layout's rendered columns.
    ///
    /// `tasks` must be the collection this layout was computed from.
    pub fn begin_drag(&self, tasks: &[Task], id: &TaskId) -> Option<DragSession> {
        DragSession::begin(tasks, id, Some(self.max_column))
    }
}
