use crate::task::{Status, Task};
use chrono::{DateTime, Utc};
use std::fmt::Display;

pub(super) const TASK_UPDATED: &str = "task updated successfully";
pub(super) const TASK_DELETED: &str = "task deleted successfully";
pub(super) const TASK_MARKED: &str = "task status changed successfully";

pub(super) const INVALID_TASK_ID: &str = r#"error: invalid "id" parameter, must be positive integer"#;
pub(super) const INVALID_DESCRIPTION: &str =
    r#"error: invalid "description" parameter, must be not empty"#;
pub(super) const TASK_ALREADY_DONE: &str = "error: cannot change status for done task";
pub(super) const TASK_LIST_IS_EMPTY: &str = "error: task list is empty";

pub(super) const HELP: &str = r#"manage tasks with ease from the command line:
 - tasker add "description"
      add a new task with the given description
 - tasker update <id> "new description"
      update the description of an existing task by its ID
 - tasker delete <id>
      delete the task with the specified ID
 - tasker mark <id> <status>
      set a new status for the task ("todo", "progress", or "done")
 - tasker work <id>
      shortcut to mark the task as "progress"
 - tasker done <id>
      shortcut to mark the task as "done"
 - tasker list [status]
      list all tasks, if a status is provided, only tasks with that status will be shown
 - tasker help
      show this help message and exit"#;

const CREATED_AT_FORMAT: &str = "%d %b %Y %H:%M:%S";

pub(super) fn task_added(id: u64) -> String {
    format!("task added successfully (ID: {id})")
}

pub(super) fn not_enough_args(command: &str) -> String {
    format!(r#"error: not enough arguments for command "{command}""#)
}

pub(super) fn invalid_args(command: &str) -> String {
    format!(r#"error: invalid arguments for command "{command}""#)
}

pub(super) fn unknown_command(command: &str) -> String {
    format!(r#"error: unknown command "{command}""#)
}

pub(super) fn invalid_status() -> String {
    let statuses = Status::ALL.map(|status| status.as_str()).join(" ");
    format!(r#"error: invalid "status" parameter, must be one of [{statuses}]"#)
}

pub(super) fn task_not_found(id: u64) -> String {
    format!("error: task (ID: {id}) not found")
}

pub(super) fn unexpected(err: &dyn Display) -> String {
    format!(r#"error: unexpected behaviour "{err}""#)
}

/// Renders tasks as blocks, most recently updated first.
pub(super) fn task_list(mut tasks: Vec<Task>, now: DateTime<Utc>) -> String {
    tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    tasks
        .iter()
        .map(|task| {
            format!(
                "---- id: {}\ndescription | {}\nstatus      | {}\ncreated at  | {}\nlast update | {} ago",
                task.id,
                task.description,
                task.status,
                task.created_at.format(CREATED_AT_FORMAT),
                last_update(task.updated_at, now)
            )
        })
        .collect::<Vec<String>>()
        .join("\n\n")
}

fn last_update(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - updated_at).max(chrono::TimeDelta::zero());
    match elapsed.num_hours() {
        0 => format!("{} minute(s)", elapsed.num_minutes()),
        hours @ 1..24 => format!("{hours} hour(s)"),
        _ => format!("{} day(s)", elapsed.num_days()),
    }
}
