//! Property checks over generated collections.

use std::collections::HashSet;

use proptest::prelude::*;
use roadmap::layout::{
    column_range, min_columns, resolve_columns, validate_and_apply_move_at,
};
use roadmap::{Task, TaskId};

use crate::fixtures::fixed_time;

// Acyclic by construction: task N may only depend on tasks 0..N-1.
fn acyclic_tasks(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            num_tasks,
        );
        let manual = proptest::collection::vec(proptest::option::of(0..12usize), num_tasks);

        (deps, manual).prop_map(|(raw_deps, manual)| {
            raw_deps
                .into_iter()
                .zip(manual)
                .enumerate()
                .map(|(i, (potential, manual_column))| {
                    let mut valid = HashSet::new();
                    if i > 0 {
                        for dep in potential {
                            valid.insert(dep % i);
                        }
                    }
                    let mut task = Task::with_id(format!("task_{}", i), "generated")
                        .depends_on(valid.into_iter().map(|dep| format!("task_{}", dep)));
                    task.manual_column = manual_column;
                    task
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn test_dependents_always_right_of_dependencies(tasks in acyclic_tasks(20)) {
        let columns = resolve_columns(&tasks);
        for task in &tasks {
            for dep in &task.dependencies {
                prop_assert!(
                    columns.column_of(&task.id) > columns.column_of(dep),
                    "{} (col {}) must be right of {} (col {})",
                    task.id,
                    columns.column_of(&task.id),
                    dep,
                    columns.column_of(dep)
                );
            }
        }
    }

    #[test]
    fn test_override_floor(tasks in acyclic_tasks(20)) {
        let minimums = min_columns(&tasks);
        let columns = resolve_columns(&tasks);
        for task in &tasks {
            let min = minimums.column_of(&task.id);
            let expected = match task.manual_column {
                Some(manual) if manual >= min => manual,
                _ => min,
            };
            prop_assert_eq!(columns.column_of(&task.id), expected);
            prop_assert_eq!(min == 0, task.dependencies.is_empty());
        }
    }

    #[test]
    fn test_resolution_is_idempotent(tasks in acyclic_tasks(20)) {
        prop_assert_eq!(resolve_columns(&tasks), resolve_columns(&tasks));
    }

    #[test]
    fn test_out_of_range_move_changes_nothing(
        tasks in acyclic_tasks(15),
        pick in any::<usize>(),
        offset in 1..5usize,
        below in any::<bool>(),
    ) {
        let target: TaskId = tasks[pick % tasks.len()].id.clone();
        let range = column_range(&tasks, &target).unwrap();

        let column = if below {
            if range.min == 0 {
                return Ok(());
            }
            range.min.saturating_sub(offset)
        } else {
            match range.ceiling {
                Some(ceiling) => ceiling + offset - 1,
                None => return Ok(()),
            }
        };
        prop_assume!(!range.contains(column));

        let outcome = validate_and_apply_move_at(&tasks, &target, column, 0, fixed_time());
        prop_assert!(!outcome.accepted);
        prop_assert!(outcome.diagnostic.is_some());
        prop_assert_eq!(outcome.tasks.as_ref(), tasks.as_slice());
    }

    #[test]
    fn test_in_range_move_is_accepted(
        tasks in acyclic_tasks(15),
        pick in any::<usize>(),
        step in 0..3usize,
        index in 0..4usize,
    ) {
        let target: TaskId = tasks[pick % tasks.len()].id.clone();
        let range = column_range(&tasks, &target).unwrap();
        prop_assume!(!range.is_empty());

        let column = match range.max() {
            Some(max) => (range.min + step).min(max),
            None => range.min + step,
        };

        let outcome = validate_and_apply_move_at(&tasks, &target, column, index, fixed_time());
        prop_assert!(outcome.accepted);

        let updated = outcome.into_tasks();
        let moved = updated.iter().find(|t| t.id == target).unwrap();
        prop_assert_eq!(moved.manual_column, Some(column));
        prop_assert_eq!(moved.manual_order, Some(index));

        // legality is preserved: the moved task still sits between its neighbours
        prop_assert_eq!(resolve_columns(&updated).column_of(&target), column);
    }
}
