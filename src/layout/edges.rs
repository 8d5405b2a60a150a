//! Abstract dependency edges between placed tasks.
//!
//! Edges carry ids and columns only; curve geometry is left to the renderer.

use crate::core::task::{Task, TaskId, TaskStatus};
use crate::layout::columns::ColumnMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One dependency relation, drawn from the dependency to the dependent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    /// `"{from}->{to}"`.
    pub id: String,
    pub from_task_id: TaskId,
    pub to_task_id: TaskId,
    pub from_column: usize,
    pub to_column: usize,
    /// The dependency task is completed, so the edge is already satisfied.
    pub from_completed: bool,
}

impl DependencyEdge {
    /// Check whether the edge starts or ends at the given task.
    pub fn touches(&self, task_id: &TaskId) -> bool {
        &self.from_task_id == task_id || &self.to_task_id == task_id
    }
}

/// One edge per (task, dependency) pair, in task order then dependency order.
/// A dependency listed more than once yields a single edge.
///
/// Dependency ids are used as listed, so a dangling id still yields an edge
/// (with column 0 on its unknown side).
pub fn compute_edges(tasks: &[Task], columns: &ColumnMap) -> Vec<DependencyEdge> {
    // reversed so the first task with a given id wins
    let statuses: HashMap<&TaskId, TaskStatus> = tasks
        .iter()
        .rev()
        .map(|task| (&task.id, task.status))
        .collect();

    let mut edges = Vec::new();
    for task in tasks {
        let to_column = columns.column_of(&task.id);

        let mut seen = HashSet::with_capacity(task.dependencies.len());
        for dep in task.dependencies.iter().filter(|dep| seen.insert(*dep)) {
            edges.push(DependencyEdge {
                id: format!("{}->{}", dep, task.id),
                from_task_id: dep.clone(),
                to_task_id: task.id.clone(),
                from_column: columns.column_of(dep),
                to_column,
                from_completed: statuses.get(dep) == Some(&TaskStatus::Completed),
            });
        }
    }
    edges
}

/// Edges to highlight while a task is hovered.
pub fn edges_touching<'a>(
    edges: &'a [DependencyEdge],
    task_id: &'a TaskId,
) -> impl Iterator<Item = &'a DependencyEdge> + 'a {
    edges.iter().filter(move |edge| edge.touches(task_id))
}
