use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// The full on-disk collection, keyed by task ID.
pub type Tasks = HashMap<u64, Task>;

#[derive(Debug, Eq, PartialEq, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a task that has not been persisted yet (ID 0, status todo).
    pub fn new(description: String, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            description,
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }
}

#[derive(Debug, Default, Eq, PartialEq, Serialize, Deserialize, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Todo,
    Progress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::Progress, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::Progress => "progress",
            Status::Done => "done",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid status \"{0}\"")]
pub struct InvalidStatus(pub String);

impl FromStr for Status {
    type Err = InvalidStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .ok_or_else(|| InvalidStatus(raw.to_string()))
    }
}
