//! Column assignment: dependency minimums and effective columns.
//!
//! The minimum column of a task is one right of the furthest-right of its
//! dependencies, where a dependency counts at the larger of its own minimum
//! and its manual column. Minimums are computed by peeling the dependency
//! graph layer by layer (Kahn's algorithm): a task is resolved once all of
//! its dependencies are. Tasks that can never be peeled because they sit on
//! a cycle fall back to column 0, after which peeling resumes so that tasks
//! downstream of the cycle are still layered.
//!
//! Nothing here is cached between calls.

use crate::core::task::{Task, TaskId};
use crate::layout::diagnostic::Diagnostic;
use crate::layout::graph::DependencyGraph;
use crate::{rlog_debug, rlog_trace};
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// Column a task on a dependency cycle is placed in.
pub const CYCLE_FALLBACK_COLUMN: usize = 0;

/// Effective column of every task, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMap(HashMap<TaskId, usize>);

impl ColumnMap {
    /// Column of a task, if it was part of the resolved collection.
    pub fn get(&self, id: &TaskId) -> Option<usize> {
        self.0.get(id).copied()
    }

    /// Column of a task, reading unknown ids as column 0.
    pub fn column_of(&self, id: &TaskId) -> usize {
        self.get(id).unwrap_or(0)
    }

    /// Highest occupied column, 0 for an empty map.
    pub fn max_column(&self) -> usize {
        self.0.values().copied().max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, usize)> {
        self.0.iter().map(|(id, col)| (id, *col))
    }
}

impl FromIterator<(TaskId, usize)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (TaskId, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-call resolution state shared by the layout operations.
///
/// `minimums` and `effective` are indexed by node, i.e. by position in the
/// task collection.
pub(crate) struct Resolution<'a> {
    pub graph: DependencyGraph<'a>,
    pub minimums: Vec<usize>,
    pub effective: Vec<usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> Resolution<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        let graph = DependencyGraph::build(tasks);
        let mut diagnostics = Vec::new();

        for dangling in graph.dangling() {
            diagnostics.push(Diagnostic::DanglingDependency {
                task_id: dangling.task.clone(),
                dependency: dangling.dependency.clone(),
            });
        }

        let minimums = layer_minimums(&graph, &mut diagnostics);
        let effective = graph
            .nodes()
            .map(|node| effective_column(graph.task_at(node), minimums[node.index()]))
            .collect();

        for diagnostic in &diagnostics {
            diagnostic.emit();
        }
        rlog_debug!(
            "resolved {} tasks ({} dependencies, {} diagnostics)",
            graph.len(),
            graph.dependency_count(),
            diagnostics.len()
        );

        Self {
            graph,
            minimums,
            effective,
            diagnostics,
        }
    }

    /// Minimum column of a task; 0 for an id outside the collection.
    pub fn min_column(&self, id: &TaskId) -> usize {
        self.graph
            .node(id)
            .map_or(0, |node| self.minimums[node.index()])
    }

    pub fn column_map(&self) -> ColumnMap {
        let mut map = HashMap::with_capacity(self.effective.len());
        for node in self.graph.nodes() {
            map.entry(self.graph.task_at(node).id.clone())
                .or_insert(self.effective[node.index()]);
        }
        ColumnMap(map)
    }
}

/// Column a task is drawn in: its manual column when that is not left of
/// the minimum, otherwise the minimum.
pub fn effective_column(task: &Task, min_column: usize) -> usize {
    match task.manual_column {
        Some(manual) if manual >= min_column => manual,
        _ => min_column,
    }
}

fn layer_minimums(graph: &DependencyGraph<'_>, diagnostics: &mut Vec<Diagnostic>) -> Vec<usize> {
    let n = graph.len();
    let mut minimums = vec![0; n];
    let mut resolved = vec![false; n];
    let mut in_degree: Vec<usize> = graph.nodes().map(|node| graph.in_degree(node)).collect();
    let mut queue: VecDeque<NodeIndex> = graph
        .nodes()
        .filter(|node| in_degree[node.index()] == 0)
        .collect();
    let mut remaining = n;
    let mut cycles_broken = false;

    loop {
        while let Some(node) = queue.pop_front() {
            let min = graph
                .dependencies(node)
                .map(|dep| {
                    let dep_min = minimums[dep.index()];
                    dep_min.max(graph.task_at(dep).manual_column.unwrap_or(dep_min))
                })
                .max()
                .map_or(0, |furthest| furthest.saturating_add(1));

            rlog_trace!("min column {} for task {}", min, graph.task_at(node).id);
            minimums[node.index()] = min;
            resolved[node.index()] = true;
            remaining -= 1;
            release_dependents(graph, node, &resolved, &mut in_degree, &mut queue);
        }

        if remaining == 0 || cycles_broken {
            break;
        }

        // Only cycle members and tasks downstream of them are left.
        let members = graph.cycle_members();
        let mut fallback: Vec<NodeIndex> = members
            .into_iter()
            .filter(|node| !resolved[node.index()])
            .collect();
        fallback.sort_unstable();

        for &node in &fallback {
            diagnostics.push(Diagnostic::CycleDetected {
                task_id: graph.task_at(node).id.clone(),
            });
            minimums[node.index()] = CYCLE_FALLBACK_COLUMN;
            resolved[node.index()] = true;
            remaining -= 1;
        }
        for &node in &fallback {
            release_dependents(graph, node, &resolved, &mut in_degree, &mut queue);
        }
        cycles_broken = true;
    }

    minimums
}

fn release_dependents(
    graph: &DependencyGraph<'_>,
    node: NodeIndex,
    resolved: &[bool],
    in_degree: &mut [usize],
    queue: &mut VecDeque<NodeIndex>,
) {
    for dependent in graph.dependents(node) {
        if resolved[dependent.index()] {
            continue;
        }
        let degree = &mut in_degree[dependent.index()];
        *degree = degree.saturating_sub(1);
        if *degree == 0 {
            queue.push_back(dependent);
        }
    }
}

/// Minimum column of a single task over the full collection.
///
/// Unknown ids have minimum 0.
pub fn min_column(task_id: &TaskId, tasks: &[Task]) -> usize {
    Resolution::new(tasks).min_column(task_id)
}

/// Minimum column of every task.
pub fn min_columns(tasks: &[Task]) -> ColumnMap {
    let resolution = Resolution::new(tasks);
    let mut map = HashMap::with_capacity(tasks.len());
    for node in resolution.graph.nodes() {
        map.entry(resolution.graph.task_at(node).id.clone())
            .or_insert(resolution.minimums[node.index()]);
    }
    ColumnMap(map)
}

/// Effective column of every task.
pub fn resolve_columns(tasks: &[Task]) -> ColumnMap {
    Resolution::new(tasks).column_map()
}

/// Effective columns together with the diagnostics raised while resolving.
pub fn resolve_columns_with_diagnostics(tasks: &[Task]) -> (ColumnMap, Vec<Diagnostic>) {
    let resolution = Resolution::new(tasks);
    let map = resolution.column_map();
    (map, resolution.diagnostics)
}
