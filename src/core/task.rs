//! Task data model for the roadmap.
//!
//! A task is a unit of work that depends on other tasks by id and may carry
//! a user-asserted placement (`manual_column`, `manual_order`) that the
//! layout engine reconciles with the dependency graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a task.
///
/// Ids come from the external task store, so any string is accepted.
/// [`TaskId::new`] generates a UUID v4 for freshly created tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a new unique task identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Return at most the first 8 characters for display.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// Task status in its lifecycle.
///
/// The layout engine only uses the status as a secondary sort key inside a
/// column (see [`TaskStatus::rank`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started, waiting for dependencies.
    #[default]
    Pending,
    /// Dependencies met, can be executed.
    Ready,
    /// Currently being executed.
    Running,
    /// Execution finished, awaiting review.
    Review,
    /// Reviewed and merged.
    Completed,
    /// Execution failed.
    Failed,
    /// Manually cancelled.
    Cancelled,
}

impl TaskStatus {
    /// Position of this status when ordering tasks within a column.
    ///
    /// Active work comes first, finished work last.
    pub fn rank(self) -> u8 {
        match self {
            TaskStatus::Running => 0,
            TaskStatus::Review => 1,
            TaskStatus::Ready => 2,
            TaskStatus::Pending => 3,
            TaskStatus::Completed => 4,
            TaskStatus::Failed => 5,
            TaskStatus::Cancelled => 6,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Ready => write!(f, "ready"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Review => write!(f, "review"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A single task on the roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for this task.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Lower value means higher priority; 0 is the highest.
    #[serde(default)]
    pub priority: u32,
    /// Tasks that must precede this one. Order is irrelevant and duplicates
    /// are treated as a single dependency.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    /// User-chosen column, honoured only while it is not left of the
    /// dependency minimum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_column: Option<usize>,
    /// User-chosen position within the column (0 = top).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_order: Option<usize>,
    pub created_at: DateTime<Utc>,
    /// Refreshed whenever a move of this task is committed.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a pending task with a generated id and no dependencies.
    pub fn new(title: &str) -> Self {
        Self::with_id(TaskId::new(), title)
    }

    /// Create a pending task with an explicit id.
    pub fn with_id(id: impl Into<TaskId>, title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: 0,
            dependencies: Vec::new(),
            manual_column: None,
            manual_order: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder: add dependencies.
    pub fn depends_on<I, T>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_manual_column(mut self, column: usize) -> Self {
        self.manual_column = Some(column);
        self
    }

    pub fn with_manual_order(mut self, order: usize) -> Self {
        self.manual_order = Some(order);
        self
    }

    /// Check whether this task lists `id` among its dependencies.
    pub fn depends_on_task(&self, id: &TaskId) -> bool {
        self.dependencies.iter().any(|dep| dep == id)
    }

    /// Check if the task is in a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}
