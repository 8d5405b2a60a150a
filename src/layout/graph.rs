//! Dependency graph over a task collection.
//!
//! The graph is rebuilt for every layout call from the collection snapshot.
//! Node `i` always corresponds to `tasks[i]`, edges point from a dependency
//! to its dependent, and duplicate or dangling dependency ids are dropped
//! while the graph is built.

use crate::core::task::{Task, TaskId};
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// A dependency id that does not name any task in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef<'a> {
    /// The task listing the dependency.
    pub task: &'a TaskId,
    /// The id that could not be found.
    pub dependency: &'a TaskId,
}

/// Id index plus petgraph view of a task collection.
pub struct DependencyGraph<'a> {
    tasks: &'a [Task],
    graph: DiGraph<(), ()>,
    /// First occurrence wins when ids repeat.
    task_index: HashMap<&'a TaskId, NodeIndex>,
    dangling: Vec<DanglingRef<'a>>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph for a collection snapshot.
    pub fn build(tasks: &'a [Task]) -> Self {
        let mut graph = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut task_index = HashMap::with_capacity(tasks.len());

        for task in tasks {
            let index = graph.add_node(());
            task_index.entry(&task.id).or_insert(index);
        }

        let mut dangling = Vec::new();
        for (position, task) in tasks.iter().enumerate() {
            let to = NodeIndex::new(position);
            for dep in &task.dependencies {
                match task_index.get(dep) {
                    // update_edge collapses repeated dependencies into one edge
                    Some(&from) => {
                        graph.update_edge(from, to, ());
                    }
                    None => dangling.push(DanglingRef {
                        task: &task.id,
                        dependency: dep,
                    }),
                }
            }
        }

        Self {
            tasks,
            graph,
            task_index,
            dangling,
        }
    }

    /// Number of tasks (nodes) in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of distinct, resolvable dependency edges.
    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All node indices in collection order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Get the NodeIndex for a task by its ID.
    pub fn node(&self, id: &TaskId) -> Option<NodeIndex> {
        self.task_index.get(id).copied()
    }

    /// Task stored at a node.
    pub fn task_at(&self, node: NodeIndex) -> &'a Task {
        &self.tasks[node.index()]
    }

    /// Get a task by its ID.
    pub fn task(&self, id: &TaskId) -> Option<&'a Task> {
        self.node(id).map(|node| self.task_at(node))
    }

    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.task_index.contains_key(id)
    }

    /// Resolvable dependencies of a node (predecessors).
    pub fn dependencies(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Incoming)
    }

    /// Nodes that depend on `node` (successors).
    pub fn dependents(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Outgoing)
    }

    /// Number of distinct resolvable dependencies of a node.
    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.dependencies(node).count()
    }

    /// Dependency ids that name no task in the collection.
    pub fn dangling(&self) -> &[DanglingRef<'a>] {
        &self.dangling
    }

    /// Nodes that sit on a dependency cycle.
    ///
    /// A node is on a cycle when its strongly connected component holds more
    /// than one node, or when it depends on itself.
    pub fn cycle_members(&self) -> HashSet<NodeIndex> {
        kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .flatten()
            .collect()
    }
}

impl std::fmt::Debug for DependencyGraph<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("tasks", &self.len())
            .field("dependencies", &self.dependency_count())
            .field("dangling", &self.dangling.len())
            .finish()
    }
}
