//! Board projection: group the task list into columns along one axis.
//!
//! Pure and total — every task lands in exactly one column per axis, and
//! column order is the fixed enumeration order, not user-configurable.

use clap::ValueEnum;

use crate::fields::{Priority, Status};
use crate::task::{Task, TaskPatch};

/// One of the two independent classification dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Axis {
    Priority,
    Status,
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Axis::Priority => "Priority",
            Axis::Status => "Progress",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Axis::Priority => Axis::Status,
            Axis::Status => Axis::Priority,
        }
    }

    /// Column values in board order.
    pub fn values(self) -> Vec<AxisValue> {
        match self {
            Axis::Priority => Priority::BOARD_ORDER
                .into_iter()
                .map(AxisValue::Priority)
                .collect(),
            Axis::Status => Status::BOARD_ORDER
                .into_iter()
                .map(AxisValue::Status)
                .collect(),
        }
    }

    /// Parse a drop-zone identifier into a value on this axis.
    pub fn parse_value(self, key: &str) -> Option<AxisValue> {
        match self {
            Axis::Priority => Priority::from_key(key).map(AxisValue::Priority),
            Axis::Status => Status::from_key(key).map(AxisValue::Status),
        }
    }
}

/// A single enumeration member on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisValue {
    Priority(Priority),
    Status(Status),
}

impl AxisValue {
    pub fn axis(self) -> Axis {
        match self {
            AxisValue::Priority(_) => Axis::Priority,
            AxisValue::Status(_) => Axis::Status,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            AxisValue::Priority(p) => p.key(),
            AxisValue::Status(s) => s.key(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AxisValue::Priority(p) => p.label(),
            AxisValue::Status(s) => s.label(),
        }
    }

    /// Parse a key against both axes, priority first. Used by the CLI
    /// `move` command where the axis is implied by the value.
    pub fn from_key(key: &str) -> Option<Self> {
        Priority::from_key(key)
            .map(AxisValue::Priority)
            .or_else(|| Status::from_key(key).map(AxisValue::Status))
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            AxisValue::Priority(p) => task.priority == p,
            AxisValue::Status(s) => task.status == s,
        }
    }

    pub fn apply(self, task: &mut Task) {
        match self {
            AxisValue::Priority(p) => task.priority = p,
            AxisValue::Status(s) => task.status = s,
        }
    }

    pub fn patch(self) -> TaskPatch {
        match self {
            AxisValue::Priority(p) => TaskPatch::priority(p),
            AxisValue::Status(s) => TaskPatch::status(s),
        }
    }
}

/// One rendered column: the axis value it represents and the tasks whose
/// corresponding field equals it, in input-list order.
pub struct Column<'a> {
    pub value: AxisValue,
    pub tasks: Vec<&'a Task>,
}

/// Project the task list into columns for the chosen axis.
pub fn columns(axis: Axis, tasks: &[Task]) -> Vec<Column<'_>> {
    axis.values()
        .into_iter()
        .map(|value| Column {
            value,
            tasks: tasks.iter().filter(|t| value.matches(t)).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NewTask;
    use chrono::Utc;

    fn task(id: u64, priority: Priority, status: Status) -> Task {
        let new = NewTask::new(format!("task {id}"), "u1");
        Task {
            id,
            title: new.title,
            description: None,
            priority,
            status,
            due_date: None,
            start_date: None,
            end_date: None,
            user_id: new.user_id,
            created_at: Utc::now(),
        }
    }

    fn fixture() -> Vec<Task> {
        vec![
            task(1, Priority::Low, Status::Todo),
            task(2, Priority::High, Status::Done),
            task(3, Priority::Medium, Status::Todo),
            task(4, Priority::High, Status::InProgress),
        ]
    }

    #[test]
    fn every_task_lands_in_exactly_one_column_per_axis() {
        let tasks = fixture();
        for axis in [Axis::Priority, Axis::Status] {
            let cols = columns(axis, &tasks);
            let mut seen: Vec<u64> = cols
                .iter()
                .flat_map(|c| c.tasks.iter().map(|t| t.id))
                .collect();
            seen.sort_unstable();
            assert_eq!(seen, vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn column_order_is_fixed_enumeration_order() {
        let tasks = fixture();
        let keys: Vec<_> = columns(Axis::Priority, &tasks)
            .iter()
            .map(|c| c.value.key())
            .collect();
        assert_eq!(keys, vec!["high", "medium", "low"]);

        let keys: Vec<_> = columns(Axis::Status, &tasks)
            .iter()
            .map(|c| c.value.key())
            .collect();
        assert_eq!(keys, vec!["todo", "in_progress", "done"]);
    }

    #[test]
    fn empty_columns_are_still_present() {
        let tasks = vec![task(1, Priority::High, Status::Done)];
        let cols = columns(Axis::Priority, &tasks);
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0].tasks.len(), 1);
        assert!(cols[1].tasks.is_empty());
        assert!(cols[2].tasks.is_empty());
    }

    #[test]
    fn intra_column_order_follows_input_order() {
        let tasks = fixture();
        let cols = columns(Axis::Priority, &tasks);
        let high: Vec<u64> = cols[0].tasks.iter().map(|t| t.id).collect();
        assert_eq!(high, vec![2, 4]);
    }

    #[test]
    fn from_key_spans_both_axes() {
        assert_eq!(
            AxisValue::from_key("high"),
            Some(AxisValue::Priority(Priority::High))
        );
        assert_eq!(
            AxisValue::from_key("done"),
            Some(AxisValue::Status(Status::Done))
        );
        assert_eq!(AxisValue::from_key("urgent"), None);
    }
}
