//! Drag-and-drop reclassification engine.
//!
//! Tracks one drag gesture at a time over the in-memory task list, applies
//! the optimistic mutation on drop, and reconciles with the repository
//! through a single-writer queue: every committed gesture enqueues one
//! pending write, and `flush` drains the queue in order, so two rapid
//! reclassifications of the same task can never race each other. A failed
//! write rolls the list back to that write's pre-drag snapshot.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::board::{Axis, AxisValue};
use crate::error::Result;
use crate::repo::TaskRepository;
use crate::store::Storage;
use crate::task::{Task, TaskId};

/// What the pointer was released over, as reported by the gesture adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Over {
    /// A column drop zone, identified by the axis value it represents.
    Column(String),
    /// Another card; `container` is the id of the column holding it.
    Card { id: TaskId, container: String },
}

/// End-of-gesture event delivered by the adapter.
#[derive(Debug, Clone)]
pub struct DragEnd {
    pub active: TaskId,
    pub over: Option<Over>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging(TaskId),
}

/// Resolution of a completed gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The card was reclassified and a persistence write queued.
    Moved(AxisValue),
    /// The gesture resolved to no valid target and was abandoned.
    Ignored,
}

struct PendingWrite {
    task_id: TaskId,
    value: AxisValue,
    /// In-memory list captured before the optimistic mutation.
    snapshot: Vec<Task>,
}

pub struct BoardEngine {
    user_id: String,
    axis: Axis,
    tasks: Vec<Task>,
    drag: DragState,
    pending: VecDeque<PendingWrite>,
}

impl BoardEngine {
    pub fn new(axis: Axis, user_id: impl Into<String>) -> Self {
        BoardEngine {
            user_id: user_id.into(),
            axis,
            tasks: Vec::new(),
            drag: DragState::Idle,
            pending: VecDeque::new(),
        }
    }

    /// Reload the task list from the repository, discarding derived state.
    pub fn refresh<S: Storage>(&mut self, repo: &TaskRepository<S>) -> Result<()> {
        self.tasks = repo.list(&self.user_id)?;
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Switch the board axis. Abandons any drag in progress: the previous
    /// axis's columns no longer exist as drop targets.
    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
        self.drag = DragState::Idle;
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// The currently-dragging task, for overlay rendering.
    pub fn active_task(&self) -> Option<&Task> {
        match self.drag {
            DragState::Idle => None,
            DragState::Dragging(id) => self.tasks.iter().find(|t| t.id == id),
        }
    }

    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Pick up a card. Refused when the task is not in the current list.
    pub fn drag_start(&mut self, id: TaskId) -> bool {
        if self.tasks.iter().any(|t| t.id == id) {
            self.drag = DragState::Dragging(id);
            true
        } else {
            false
        }
    }

    pub fn drag_cancel(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Resolve a drop and, if it names a column on the current axis, apply
    /// the optimistic mutation and queue the persistence write.
    pub fn drag_end(&mut self, event: DragEnd) -> DropOutcome {
        self.drag = DragState::Idle;

        let Some(over) = event.over else {
            return DropOutcome::Ignored;
        };
        let key = match &over {
            Over::Column(id) => id.as_str(),
            // Dropping a card onto itself covers both "same column" and
            // "same position in the same column".
            Over::Card { id, .. } if *id == event.active => return DropOutcome::Ignored,
            Over::Card { container, .. } => container.as_str(),
        };
        let Some(value) = self.axis.parse_value(key) else {
            return DropOutcome::Ignored;
        };
        // The task may have been deleted while the drag was in flight.
        let Some(pos) = self.tasks.iter().position(|t| t.id == event.active) else {
            return DropOutcome::Ignored;
        };

        let snapshot = self.tasks.clone();
        value.apply(&mut self.tasks[pos]);
        self.pending.push_back(PendingWrite {
            task_id: event.active,
            value,
            snapshot,
        });
        debug!(task = event.active, value = value.key(), "reclassification queued");
        DropOutcome::Moved(value)
    }

    /// Drain queued writes in order. On the first failure the optimistic
    /// state is rolled back to that write's snapshot, the remaining queue
    /// is dropped (it was derived from the rolled-back state), and the
    /// error is surfaced so the caller can report it.
    pub fn flush<S: Storage>(&mut self, repo: &mut TaskRepository<S>) -> Result<usize> {
        let mut flushed = 0;
        while let Some(write) = self.pending.pop_front() {
            match repo.update(write.task_id, &self.user_id, &write.value.patch()) {
                Ok(_) => flushed += 1,
                Err(e) => {
                    warn!(task = write.task_id, error = %e, "persistence failed, rolling back");
                    self.tasks = write.snapshot;
                    self.pending.clear();
                    return Err(e);
                }
            }
        }
        Ok(flushed)
    }
}
