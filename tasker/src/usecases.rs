//! Validation and business rules for tasks.
//!
//! Every operation validates its raw input before it reaches the repository,
//! so a rejected request never loads or writes the store.

use crate::repository::{self, TaskRepository};
use crate::store;
use crate::task::{Status, Task};
use chrono::Utc;
use log::info;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("invalid task ID \"{0}\"")]
    InvalidTaskId(String),
    #[error("invalid status \"{0}\"")]
    InvalidStatus(String),
    #[error("task {0} not found")]
    TaskNotFound(u64),
    #[error("task {0} is already done")]
    TaskAlreadyDone(u64),
    #[error("no tasks to show")]
    EmptyTasks,
    #[error("{operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: store::Error,
    },
}

impl Error {
    /// Tags a repository failure with the operation that triggered it.
    fn repository(operation: &'static str) -> impl FnOnce(repository::Error) -> Self {
        move |err| match err {
            repository::Error::TaskNotFound(id) => Error::TaskNotFound(id),
            repository::Error::Store(source) => Error::Store { operation, source },
        }
    }
}

pub struct UseCases<R> {
    repository: R,
}

impl<R: TaskRepository> UseCases<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn add_task(&mut self, description: &str) -> Result<Task, Error> {
        const OPERATION: &str = "add_task";
        let description = validate_description(description)?;
        let task = self
            .repository
            .save_task(Task::new(description, Utc::now()))
            .map_err(Error::repository(OPERATION))?;
        info!("added task {}", task.id);
        Ok(task)
    }

    pub fn update_task(&self, id: &str, description: &str) -> Result<Task, Error> {
        const OPERATION: &str = "update_task";
        let id = validate_task_id(id)?;
        let description = validate_description(description)?;
        let mut task = self
            .repository
            .get_by_id(id)
            .map_err(Error::repository(OPERATION))?;
        task.description = description;
        task.updated_at = Utc::now();
        self.repository
            .update_task(&task)
            .map_err(Error::repository(OPERATION))?;
        info!("updated task {id}");
        Ok(task)
    }

    pub fn delete_task(&self, id: &str) -> Result<(), Error> {
        const OPERATION: &str = "delete_task";
        let id = validate_task_id(id)?;
        let task = self
            .repository
            .get_by_id(id)
            .map_err(Error::repository(OPERATION))?;
        self.repository
            .delete_task(&task)
            .map_err(Error::repository(OPERATION))?;
        info!("deleted task {id}");
        Ok(())
    }

    /// Moves a task to `status`. Done is terminal: a done task can't change
    /// status again.
    pub fn mark_task(&self, id: &str, status: &str) -> Result<Task, Error> {
        const OPERATION: &str = "mark_task";
        let id = validate_task_id(id)?;
        let status = validate_status(status)?;
        let mut task = self
            .repository
            .get_by_id(id)
            .map_err(Error::repository(OPERATION))?;
        if task.is_done() {
            return Err(Error::TaskAlreadyDone(id));
        }
        task.status = status;
        task.updated_at = Utc::now();
        self.repository
            .update_task(&task)
            .map_err(Error::repository(OPERATION))?;
        info!("marked task {id} as {status}");
        Ok(task)
    }

    /// Lists every task, or only those with the given status. A blank status
    /// means no filter. An empty result is reported as [`Error::EmptyTasks`].
    pub fn list_tasks(&self, status: Option<&str>) -> Result<Vec<Task>, Error> {
        const OPERATION: &str = "list_tasks";
        let status = status.filter(|status| !status.is_empty());
        let tasks = match status.map(validate_status).transpose()? {
            Some(status) => self.repository.list_by_status(status),
            None => self.repository.list_all(),
        }
        .map_err(Error::repository(OPERATION))?;
        if tasks.is_empty() {
            return Err(Error::EmptyTasks);
        }
        Ok(tasks)
    }
}

fn validate_description(description: &str) -> Result<String, Error> {
    match description.trim() {
        "" => Err(Error::EmptyDescription),
        trimmed => Ok(trimmed.to_string()),
    }
}

/// Accepts plain decimal digits only; signs and whitespace are rejected.
fn validate_task_id(id: &str) -> Result<u64, Error> {
    if id.is_empty() || !id.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(Error::InvalidTaskId(id.to_string()));
    }
    id.parse()
        .map_err(|_| Error::InvalidTaskId(id.to_string()))
}

fn validate_status(status: &str) -> Result<Status, Error> {
    status
        .parse()
        .map_err(|_| Error::InvalidStatus(status.to_string()))
}
