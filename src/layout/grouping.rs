//! Partitioning tasks into columns and ordering each column.

use crate::core::task::{Task, TaskId};
use crate::layout::columns::ColumnMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Ordered task ids per column, keys ascending, empty columns omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnGroups(BTreeMap<usize, Vec<TaskId>>);

impl ColumnGroups {
    /// Tasks of a column in display order; empty for an unoccupied column.
    pub fn column(&self, column: usize) -> &[TaskId] {
        self.0.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Occupied columns in ascending order.
    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.keys().copied()
    }

    /// `(column, tasks)` pairs in ascending column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[TaskId])> {
        self.0.iter().map(|(col, ids)| (*col, ids.as_slice()))
    }

    /// Highest occupied column, 0 when there are none.
    pub fn max_column(&self) -> usize {
        self.0.keys().next_back().copied().unwrap_or(0)
    }

    /// Position of a task within its column.
    pub fn position_of(&self, id: &TaskId) -> Option<(usize, usize)> {
        self.0.iter().find_map(|(col, ids)| {
            ids.iter().position(|other| other == id).map(|index| (*col, index))
        })
    }

    /// Number of occupied columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Order of two tasks sharing a column.
///
/// Manual order wins when both tasks carry one, and a task with a manual
/// order sorts before one without. Otherwise active work comes first by
/// status rank, then priority.
pub fn compare_within_column(a: &Task, b: &Task) -> Ordering {
    match (a.manual_order, b.manual_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| a.priority.cmp(&b.priority)),
    }
}

/// Group tasks by effective column and order each group.
///
/// Ties beyond [`compare_within_column`] keep collection order. A task the
/// map does not know lands in column 0.
pub fn group_by_column(tasks: &[Task], columns: &ColumnMap) -> ColumnGroups {
    let mut groups: BTreeMap<usize, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        groups
            .entry(columns.column_of(&task.id))
            .or_default()
            .push(task);
    }

    ColumnGroups(
        groups
            .into_iter()
            .map(|(col, mut members)| {
                // sort_by is stable
                members.sort_by(|a, b| compare_within_column(a, b));
                (col, members.into_iter().map(|t| t.id.clone()).collect())
            })
            .collect(),
    )
}

/// Flat ordering for list views: column ascending, then priority, then
/// collection order.
pub fn list_order<'a>(tasks: &'a [Task], columns: &ColumnMap) -> Vec<&'a Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| {
        columns
            .column_of(&a.id)
            .cmp(&columns.column_of(&b.id))
            .then_with(|| a.priority.cmp(&b.priority))
    });
    sorted
}
