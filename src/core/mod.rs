//! Core domain model for the roadmap.
//!
//! Tasks reference each other only by id; the layout engine builds its own
//! index over a collection snapshot for every call.

pub mod task;

pub use task::{Task, TaskId, TaskStatus};
