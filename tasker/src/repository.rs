//! Task persistence on top of [`JsonFile`].
//!
//! Every operation loads the whole collection, touches one entry and writes
//! the collection back. The repository also owns ID assignment: IDs come
//! from a counter seeded with the largest ID on disk and are never reused.

use crate::store::{self, JsonFile};
use crate::task::{Status, Task, Tasks};
use log::debug;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("task {0} not found")]
    TaskNotFound(u64),
    #[error(transparent)]
    Store(#[from] store::Error),
}

/// Task-level operations over a persistent collection.
///
/// Listing never treats an empty result as an error; that policy belongs to
/// the caller.
#[cfg_attr(test, mockall::automock)]
pub trait TaskRepository {
    /// Assigns the next ID to `task`, persists it and returns it.
    fn save_task(&mut self, task: Task) -> Result<Task, Error>;
    /// Overwrites the entry stored under `task.id`.
    fn update_task(&self, task: &Task) -> Result<(), Error>;
    /// Removes the entry stored under `task.id`. Removing an absent ID is a no-op.
    fn delete_task(&self, task: &Task) -> Result<(), Error>;
    fn get_by_id(&self, id: u64) -> Result<Task, Error>;
    fn list_all(&self) -> Result<Vec<Task>, Error>;
    fn list_by_status(&self, status: Status) -> Result<Vec<Task>, Error>;
}

pub struct JsonTaskRepository {
    store: JsonFile<Tasks>,
    last_id: u64,
}

impl JsonTaskRepository {
    pub fn new(store: JsonFile<Tasks>) -> Result<Self, Error> {
        let tasks = store.load()?;
        let last_id = tasks.keys().copied().max().unwrap_or(0);
        debug!(
            "loaded {} task(s) from {}, last ID is {}",
            tasks.len(),
            store.path().display(),
            last_id
        );
        Ok(Self { store, last_id })
    }

    /// Opens (and if needed creates) the JSON file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        Self::new(JsonFile::new(path)?)
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }
}

impl TaskRepository for JsonTaskRepository {
    fn save_task(&mut self, mut task: Task) -> Result<Task, Error> {
        let mut tasks = self.store.load()?;
        let id = self.last_id + 1;
        task.id = id;
        tasks.insert(id, task.clone());
        self.store.save(&tasks)?;
        self.last_id = id;
        debug!("saved task {id}");
        Ok(task)
    }

    fn update_task(&self, task: &Task) -> Result<(), Error> {
        let mut tasks = self.store.load()?;
        tasks.insert(task.id, task.clone());
        self.store.save(&tasks)?;
        debug!("updated task {}", task.id);
        Ok(())
    }

    fn delete_task(&self, task: &Task) -> Result<(), Error> {
        let mut tasks = self.store.load()?;
        if tasks.remove(&task.id).is_none() {
            debug!("task {} already absent", task.id);
        }
        self.store.save(&tasks)?;
        Ok(())
    }

    fn get_by_id(&self, id: u64) -> Result<Task, Error> {
        self.store
            .load()?
            .remove(&id)
            .ok_or(Error::TaskNotFound(id))
    }

    fn list_all(&self) -> Result<Vec<Task>, Error> {
        Ok(self.store.load()?.into_values().collect())
    }

    fn list_by_status(&self, status: Status) -> Result<Vec<Task>, Error> {
        Ok(self
            .store
            .load()?
            .into_values()
            .filter(|task| task.status == status)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use chrono::Utc;
    use std::fs;

    fn setup() -> (TempDir, JsonTaskRepository) {
        let dir = TempDir::new().unwrap();
        let repo = JsonTaskRepository::open(dir.path().join("tasker.json")).unwrap();
        (dir, repo)
    }

    fn new_task(description: &str) -> Task {
        Task::new(description.to_string(), Utc::now())
    }

    #[test]
    fn test_new_repository_starts_with_id_zero() {
        let (_dir, repo) = setup();
        assert_eq!(repo.last_id(), 0, "Empty store should start with last_id = 0");
    }

    #[test]
    fn test_save_task_assigns_sequential_ids() {
        let (_dir, mut repo) = setup();

        let task1 = repo.save_task(new_task("Task 1")).unwrap();
        let task2 = repo.save_task(new_task("Task 2")).unwrap();
        let task3 = repo.save_task(new_task("Task 3")).unwrap();

        assert_eq!(task1.id, 1, "First task should have ID 1");
        assert_eq!(task2.id, 2, "Second task should have ID 2");
        assert_eq!(task3.id, 3, "Third task should have ID 3");
        assert_eq!(repo.last_id(), 3);
        assert_eq!(repo.get_by_id(2).unwrap().description, "Task 2");
    }

    #[test]
    fn test_last_id_seeded_from_max_id_on_disk() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasker.json");
        let json = r#"
        {
            "4": {
                "id": 4,
                "description": "Task 4",
                "status": "todo",
                "createdAt": "2023-01-01T00:00:00Z",
                "updatedAt": "2023-01-01T00:00:00Z"
            },
            "42": {
                "id": 42,
                "description": "Task 42",
                "status": "done",
                "createdAt": "2023-01-01T00:00:00Z",
                "updatedAt": "2023-01-01T00:00:00Z"
            }
        }
        "#;
        fs::write(&path, json).unwrap();

        // Act
        let mut repo = JsonTaskRepository::open(&path).unwrap();
        let task = repo.save_task(new_task("Next")).unwrap();

        // Assert
        assert_eq!(task.id, 43, "New ID should follow the largest existing ID");
        assert_eq!(repo.last_id(), 43);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let (_dir, mut repo) = setup();
        repo.save_task(new_task("Task 1")).unwrap();
        let task2 = repo.save_task(new_task("Task 2")).unwrap();
        repo.save_task(new_task("Task 3")).unwrap();

        repo.delete_task(&task2).unwrap();
        let task4 = repo.save_task(new_task("Task 4")).unwrap();

        assert_eq!(task4.id, 4, "New task should get ID 4, not reuse the removed ID 2");
    }

    #[test]
    fn test_ids_not_reused_after_deleting_newest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasker.json");
        let mut repo = JsonTaskRepository::open(&path).unwrap();
        repo.save_task(new_task("Task 1")).unwrap();
        let task2 = repo.save_task(new_task("Task 2")).unwrap();
        repo.delete_task(&task2).unwrap();

        let task3 = repo.save_task(new_task("Task 3")).unwrap();

        assert_eq!(task3.id, 3);
    }

    #[test]
    fn test_failed_save_does_not_advance_counter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasker.json");
        let mut repo = JsonTaskRepository::open(&path).unwrap();
        fs::write(&path, "not json").unwrap();

        let result = repo.save_task(new_task("Task 1"));

        assert!(matches!(
            result,
            Err(Error::Store(store::Error::Decode { .. }))
        ));
        assert_eq!(repo.last_id(), 0);
    }

    #[test]
    fn test_update_task_overwrites_entry() {
        let (_dir, mut repo) = setup();
        let mut task = repo.save_task(new_task("Old")).unwrap();

        task.description = "New".to_string();
        task.status = Status::Progress;
        repo.update_task(&task).unwrap();

        assert_eq!(repo.get_by_id(task.id).unwrap(), task);
        assert_eq!(repo.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_task_removes_entry() {
        let (_dir, mut repo) = setup();
        let task = repo.save_task(new_task("Doomed")).unwrap();

        repo.delete_task(&task).unwrap();

        assert!(matches!(repo.get_by_id(task.id), Err(Error::TaskNotFound(1))));
    }

    #[test]
    fn test_delete_absent_task_is_noop() {
        let (_dir, mut repo) = setup();
        repo.save_task(new_task("Stays")).unwrap();
        let ghost = Task {
            id: 99,
            ..new_task("Ghost")
        };

        repo.delete_task(&ghost).unwrap();

        assert_eq!(repo.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_get_by_id_missing_task() {
        let (_dir, repo) = setup();

        assert!(matches!(repo.get_by_id(0), Err(Error::TaskNotFound(0))));
        assert!(matches!(repo.get_by_id(7), Err(Error::TaskNotFound(7))));
    }

    #[test]
    fn test_list_all_on_empty_store_is_empty() {
        let (_dir, repo) = setup();

        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_by_status_filters() {
        // Arrange
        let (_dir, mut repo) = setup();
        repo.save_task(new_task("Todo 1")).unwrap();
        let mut progress = repo.save_task(new_task("Progress")).unwrap();
        repo.save_task(new_task("Todo 2")).unwrap();
        progress.status = Status::Progress;
        repo.update_task(&progress).unwrap();

        // Act
        let mut todo_ids: Vec<u64> = repo
            .list_by_status(Status::Todo)
            .unwrap()
            .into_iter()
            .map(|task| task.id)
            .collect();
        todo_ids.sort();
        let in_progress = repo.list_by_status(Status::Progress).unwrap();
        let done = repo.list_by_status(Status::Done).unwrap();

        // Assert
        assert_eq!(todo_ids, vec![1, 3]);
        assert_eq!(in_progress, vec![progress]);
        assert!(done.is_empty(), "No match should be an empty list, not an error");
    }

    #[test]
    fn test_open_malformed_store_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasker.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let result = JsonTaskRepository::open(&path);

        assert!(matches!(
            result,
            Err(Error::Store(store::Error::Decode { .. }))
        ));
    }
}
