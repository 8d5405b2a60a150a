pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod layout;
pub mod log;
pub mod roadmap;
pub mod store;

pub use crate::core::{Task, TaskId, TaskStatus};
pub use error::{Error, Result};
pub use layout::{ColumnRange, Diagnostic, DragSession, Layout, MoveOutcome};
pub use roadmap::{LayoutSnapshot, MoveResult, Roadmap};
