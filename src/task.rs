//! Task record type and its creation/patch companions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{Priority, Status};

pub type TaskId = u64;

/// A single tracked task. Belongs to exactly one column on the priority
/// board and exactly one column on the status board at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub user_id: String,
    /// Set once by the repository at creation, never mutated.
    pub created_at: DateTime<Utc>,
}

/// Input for `TaskRepository::create`. Id and creation timestamp are
/// assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub user_id: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, user_id: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            description: None,
            priority: Priority::Medium,
            status: Status::Todo,
            due_date: None,
            start_date: None,
            end_date: None,
            user_id: user_id.into(),
        }
    }
}

/// Partial update merged onto an existing task. `None` fields are left
/// unchanged; `id`, `user_id` and `created_at` are never patchable.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn priority(priority: Priority) -> Self {
        TaskPatch {
            priority: Some(priority),
            ..TaskPatch::default()
        }
    }

    pub fn status(status: Status) -> Self {
        TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        }
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due) = self.due_date {
            task.due_date = Some(due);
        }
        if let Some(start) = self.start_date {
            task.start_date = Some(start);
        }
        if let Some(end) = self.end_date {
            task.end_date = Some(end);
        }
    }
}
