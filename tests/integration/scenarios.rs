//! Reference layouts and column guarantees.

use roadmap::layout::{
    column_range, compute_edges, effective_column, group_by_column, list_order, min_column,
    min_columns, resolve_columns, resolve_columns_with_diagnostics, ColumnRange,
};
use roadmap::{Diagnostic, Layout, TaskStatus};

use crate::fixtures::{chain, diamond, id, layered, task};

#[test]
fn test_straight_chain() {
    let tasks = vec![task("A", &[]), task("B", &["A"]), task("C", &["B"])];
    let columns = resolve_columns(&tasks);

    assert_eq!(columns.get(&id("A")), Some(0));
    assert_eq!(columns.get(&id("B")), Some(1));
    assert_eq!(columns.get(&id("C")), Some(2));
    assert_eq!(columns.len(), 3);
}

#[test]
fn test_manual_column_pushes_dependents() {
    let tasks = vec![
        task("A", &[]),
        task("D", &["A"]).with_manual_column(5),
        task("E", &["D"]),
    ];

    assert_eq!(min_column(&id("D"), &tasks), 1);
    assert_eq!(resolve_columns(&tasks).get(&id("D")), Some(5));
    assert_eq!(min_column(&id("E"), &tasks), 6);
}

#[test]
fn test_two_task_cycle_terminates() {
    let tasks = vec![task("A", &["B"]), task("B", &["A"])];
    let (columns, diagnostics) = resolve_columns_with_diagnostics(&tasks);

    assert_eq!(columns.get(&id("A")), Some(0));
    assert_eq!(columns.get(&id("B")), Some(0));
    assert!(diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::CycleDetected { .. })));
}

#[test]
fn test_dependents_bound_the_range() {
    let tasks = vec![
        task("X", &[]),
        task("Y", &["X"]).with_manual_column(3),
        task("Z", &["X"]).with_manual_column(5),
    ];

    let range = column_range(&tasks, &id("X")).unwrap();
    assert_eq!(range, ColumnRange::new(0, Some(3)));
    assert_eq!(range.max(), Some(2));
    assert!(!range.contains(3));
}

#[test]
fn test_tasks_after_a_cycle_still_layer() {
    let tasks = vec![
        task("a", &["b"]),
        task("b", &["a"]),
        task("c", &["a"]),
        task("d", &["c"]),
    ];
    let columns = resolve_columns(&tasks);

    assert_eq!(columns.get(&id("c")), Some(1));
    assert_eq!(columns.get(&id("d")), Some(2));
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let tasks = vec![task("a", &["a"]), task("b", &["a"])];
    let (columns, diagnostics) = resolve_columns_with_diagnostics(&tasks);

    assert_eq!(columns.get(&id("a")), Some(0));
    assert_eq!(columns.get(&id("b")), Some(1));
    assert_eq!(
        diagnostics,
        vec![Diagnostic::CycleDetected { task_id: id("a") }]
    );
}

#[test]
fn test_base_case_iff_no_resolvable_dependencies() {
    let tasks = vec![
        task("root", &[]),
        task("orphan", &["missing"]),
        task("child", &["root", "missing"]),
    ];
    let minimums = min_columns(&tasks);

    assert_eq!(minimums.get(&id("root")), Some(0));
    assert_eq!(minimums.get(&id("orphan")), Some(0));
    assert_eq!(minimums.get(&id("child")), Some(1));
}

#[test]
fn test_dangling_dependency_reported() {
    let tasks = vec![task("a", &["ghost"])];
    let (_, diagnostics) = resolve_columns_with_diagnostics(&tasks);

    assert_eq!(
        diagnostics,
        vec![Diagnostic::DanglingDependency {
            task_id: id("a"),
            dependency: id("ghost"),
        }]
    );
}

#[test]
fn test_manual_column_below_minimum_is_ignored() {
    let tasks = vec![
        task("a", &[]),
        task("b", &["a"]),
        task("c", &["b"]).with_manual_column(1),
    ];
    let columns = resolve_columns(&tasks);

    assert_eq!(columns.get(&id("c")), Some(2));
    assert_eq!(effective_column(&tasks[2], 2), 2);
    assert_eq!(effective_column(&tasks[2], 0), 1);
}

#[test]
fn test_duplicate_dependencies_count_once() {
    let tasks = vec![task("a", &[]), task("b", &["a", "a", "a"])];
    let layout = Layout::compute(&tasks);

    assert_eq!(layout.column_of(&id("b")), Some(1));
    assert!(layout.diagnostics.is_empty());
    assert_eq!(layout.edges.len(), 1);
    assert_eq!(layout.edges[0].id, "a->b");
}

#[test]
fn test_diamond_layout() {
    let tasks = diamond();
    let layout = Layout::compute(&tasks);

    assert_eq!(layout.column_of(&id("design")), Some(0));
    assert_eq!(layout.column_of(&id("api")), Some(1));
    assert_eq!(layout.column_of(&id("ui")), Some(1));
    assert_eq!(layout.column_of(&id("release")), Some(2));
    assert_eq!(layout.max_column, 2);

    // running work sorts ahead of pending work
    assert_eq!(layout.groups.column(1), &[id("api"), id("ui")]);
}

#[test]
fn test_diamond_edges() {
    let tasks = diamond();
    let columns = resolve_columns(&tasks);
    let edges = compute_edges(&tasks, &columns);

    assert_eq!(edges.len(), 4);
    let ids: Vec<&str> = edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["design->api", "design->ui", "api->release", "ui->release"]
    );
    assert!(edges[0].from_completed);
    assert!(!edges[2].from_completed);
    assert!(edges.iter().all(|e| e.to_column > e.from_column));
}

#[test]
fn test_manual_order_within_column() {
    let tasks = vec![
        task("root", &[]),
        task("x", &["root"]).with_status(TaskStatus::Running),
        task("y", &["root"]).with_manual_order(1),
        task("z", &["root"]).with_manual_order(0),
    ];
    let groups = group_by_column(&tasks, &resolve_columns(&tasks));

    assert_eq!(groups.column(1), &[id("z"), id("y"), id("x")]);
}

#[test]
fn test_list_order_sorts_by_column_then_priority() {
    let tasks = vec![
        task("late", &["early"]).with_priority(0),
        task("early", &[]).with_priority(5),
        task("other", &[]).with_priority(1),
    ];
    let columns = resolve_columns(&tasks);
    let order: Vec<&str> = list_order(&tasks, &columns)
        .iter()
        .map(|t| t.id.as_str())
        .collect();

    assert_eq!(order, vec!["other", "early", "late"]);
}

#[test]
fn test_long_chain_layers() {
    let tasks = chain(500);
    let columns = resolve_columns(&tasks);

    assert_eq!(columns.get(&id("t0")), Some(0));
    assert_eq!(columns.get(&id("t499")), Some(499));
    assert_eq!(columns.max_column(), 499);
}

#[test]
fn test_layered_grid() {
    let tasks = layered(4, 5);
    let layout = Layout::compute(&tasks);

    assert_eq!(layout.groups.len(), 5);
    for column in 0..5 {
        assert_eq!(layout.groups.column(column).len(), 4);
    }
    assert_eq!(layout.edges.len(), 4 * 4 * 4);
}

#[test]
fn test_results_do_not_leak_between_collections() {
    let first = vec![task("a", &[]), task("b", &["a"])];
    let second = vec![task("b", &[]), task("a", &["b"])];

    assert_eq!(resolve_columns(&first).get(&id("b")), Some(1));
    assert_eq!(resolve_columns(&second).get(&id("b")), Some(0));
    assert_eq!(resolve_columns(&first).get(&id("b")), Some(1));
}
