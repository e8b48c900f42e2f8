//! Task repository: CRUD over the `tasks` collection.
//!
//! Sole writer of the serialized task collection. Owns id generation and
//! creation timestamps; callers hold only derived, read-only copies.

use std::cmp::Ordering;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::store::{RecordStore, Storage};
use crate::task::{NewTask, Task, TaskId, TaskPatch};

pub const TASKS: &str = "tasks";

pub struct TaskRepository<S: Storage> {
    store: RecordStore<S>,
}

impl<S: Storage> TaskRepository<S> {
    pub fn new(storage: S) -> Self {
        TaskRepository {
            store: RecordStore::new(storage),
        }
    }

    pub fn store_mut(&mut self) -> &mut RecordStore<S> {
        &mut self.store
    }

    /// Assign a fresh id and creation timestamp, append and persist.
    pub fn create(&mut self, new: NewTask) -> Result<Task> {
        if new.title.trim().is_empty() {
            return Err(Error::InvalidRecord {
                reason: "task title cannot be empty".into(),
            });
        }
        let mut tasks: Vec<Task> = self.store.load(TASKS, &new.user_id)?;
        let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let task = Task {
            id,
            title: new.title,
            description: new.description,
            priority: new.priority,
            status: new.status,
            due_date: new.due_date,
            start_date: new.start_date,
            end_date: new.end_date,
            user_id: new.user_id,
            created_at: Utc::now(),
        };
        tasks.push(task.clone());
        self.store.save(TASKS, &task.user_id, &tasks)?;
        Ok(task)
    }

    /// All tasks for the user, ascending by start date. Tasks without a
    /// start date sort last; id breaks ties so the order is stable.
    pub fn list(&self, user: &str) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self.store.load(TASKS, user)?;
        tasks.sort_by(|a, b| match (a.start_date, b.start_date) {
            (Some(x), Some(y)) => x.cmp(&y).then(a.id.cmp(&b.id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        });
        Ok(tasks)
    }

    pub fn get(&self, id: TaskId, user: &str) -> Result<Option<Task>> {
        let tasks: Vec<Task> = self.store.load(TASKS, user)?;
        Ok(tasks.into_iter().find(|t| t.id == id))
    }

    /// Merge a patch onto the matching record. Fails loudly when the id is
    /// absent from the user's collection.
    pub fn update(&mut self, id: TaskId, user: &str, patch: &TaskPatch) -> Result<Task> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(Error::InvalidRecord {
                    reason: "task title cannot be empty".into(),
                });
            }
        }
        let mut tasks: Vec<Task> = self.store.load(TASKS, user)?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Err(Error::NotFound { id });
        };
        patch.apply(task);
        let updated = task.clone();
        self.store.save(TASKS, user, &tasks)?;
        Ok(updated)
    }

    /// Remove one record. Silent no-op when the id is absent.
    pub fn delete(&mut self, id: TaskId, user: &str) -> Result<()> {
        let mut tasks: Vec<Task> = self.store.load(TASKS, user)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() != before {
            self.store.save(TASKS, user, &tasks)?;
        }
        Ok(())
    }

    /// Clear the user's entire task collection.
    pub fn delete_all(&mut self, user: &str) -> Result<()> {
        self.store.clear(TASKS, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, Status};
    use crate::store::MemoryStorage;
    use chrono::NaiveDate;

    fn repo() -> TaskRepository<MemoryStorage> {
        TaskRepository::new(MemoryStorage::new())
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn create_assigns_id_and_timestamp() {
        let mut repo = repo();
        let created = repo.create(NewTask::new("Buy groceries", "u1")).unwrap();
        assert_eq!(created.id, 1);

        let listed = repo.list("u1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], created);
    }

    #[test]
    fn create_rejects_empty_title() {
        let mut repo = repo();
        let err = repo.create(NewTask::new("   ", "u1")).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
        assert!(repo.list("u1").unwrap().is_empty());
    }

    #[test]
    fn ids_are_unique_per_user() {
        let mut repo = repo();
        let a = repo.create(NewTask::new("a", "u1")).unwrap();
        let b = repo.create(NewTask::new("b", "u1")).unwrap();
        repo.delete(a.id, "u1").unwrap();
        let c = repo.create(NewTask::new("c", "u1")).unwrap();
        assert_ne!(b.id, c.id);
    }

    #[test]
    fn list_sorts_by_start_date_then_id() {
        let mut repo = repo();
        let mut late = NewTask::new("late", "u1");
        late.start_date = Some(date(20));
        let mut early = NewTask::new("early", "u1");
        early.start_date = Some(date(5));
        let undated = NewTask::new("undated", "u1");

        repo.create(late).unwrap();
        repo.create(early).unwrap();
        repo.create(undated).unwrap();

        let titles: Vec<_> = repo
            .list("u1")
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["early", "late", "undated"]);
    }

    #[test]
    fn update_merges_patch_and_keeps_rest() {
        let mut repo = repo();
        let task = repo.create(NewTask::new("t", "u1")).unwrap();
        let updated = repo
            .update(task.id, "u1", &TaskPatch::priority(Priority::High))
            .unwrap();
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.status, Status::Todo);
        assert_eq!(updated.title, "t");

        let listed = repo.list("u1").unwrap();
        assert_eq!(listed[0].priority, Priority::High);
    }

    #[test]
    fn update_missing_id_fails_and_leaves_store_untouched() {
        let mut repo = repo();
        repo.create(NewTask::new("t", "u1")).unwrap();
        let before = repo.list("u1").unwrap();

        let err = repo
            .update(99, "u1", &TaskPatch::status(Status::Done))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 99 }));
        assert_eq!(repo.list("u1").unwrap(), before);
    }

    #[test]
    fn delete_removes_record_and_unknown_id_is_noop() {
        let mut repo = repo();
        let task = repo.create(NewTask::new("t", "u1")).unwrap();
        repo.delete(task.id, "u1").unwrap();
        assert!(repo.list("u1").unwrap().is_empty());
        repo.delete(task.id, "u1").unwrap();
    }

    #[test]
    fn delete_all_is_scoped_to_user() {
        let mut repo = repo();
        repo.create(NewTask::new("mine", "u1")).unwrap();
        repo.create(NewTask::new("theirs", "u2")).unwrap();

        repo.delete_all("u1").unwrap();
        assert!(repo.list("u1").unwrap().is_empty());
        assert_eq!(repo.list("u2").unwrap().len(), 1);
    }
}
