//! Task model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::nullable::{NullDate, NullString};

/// Task entity
///
/// The owner never comes from the body; controllers set it from the caller's
/// identity. `is_completed` stays `None` when a payload does not mention it,
/// so an update can tell "leave as is" from "mark as not done".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: NullString,
    pub title: NullString,
    pub content: NullString,
    #[serde(skip)]
    pub user_id: NullString,
    #[serde(rename = "iscomp")]
    pub is_completed: Option<bool>,
    pub date: NullDate,
    #[serde(skip)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build a task from plain values; empty strings count as unset.
    ///
    /// An unparsable `date` is an error.
    #[cfg(test)]
    pub fn new(
        id: &str,
        title: &str,
        content: &str,
        user_id: &str,
        date: &str,
    ) -> Result<Self, super::nullable::NullableError> {
        Ok(Self {
            id: NullString::from(id),
            title: NullString::from(title),
            content: NullString::from(content),
            user_id: NullString::from(user_id),
            is_completed: Some(false),
            date: NullDate::parse(date)?,
            ..Self::default()
        })
    }

    #[cfg(test)]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.is_completed = Some(completed);
        self
    }

    /// Assign a freshly generated identifier
    pub fn assign_new_id(&mut self) -> &mut Self {
        self.id = NullString::new(Uuid::new_v4().to_string());
        self
    }

    /// Completion flag as persisted (unset means not completed)
    pub fn completed(&self) -> bool {
        self.is_completed.unwrap_or(false)
    }

    /// Whether the payload carries anything a task update could change
    pub fn has_changes(&self) -> bool {
        !(self.title.is_null()
            && self.content.is_null()
            && self.date.is_null()
            && self.is_completed.is_none())
    }

    /// Fill every unset field from the stored record.
    pub fn fill_unset_from(&mut self, existing: &Task) {
        self.title.fill_from(&existing.title);
        self.content.fill_from(&existing.content);
        self.date.fill_from(&existing.date);
        if self.is_completed.is_none() {
            self.is_completed = existing.is_completed;
        }
        self.created_at = existing.created_at;
    }
}

/// Response for task operations; never carries the owner
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: NullString,
    pub title: NullString,
    pub content: NullString,
    pub iscomp: bool,
    pub date: NullDate,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            content: task.content.clone(),
            iscomp: task.completed(),
            date: task.date.clone(),
        }
    }
}

/// Query parameters for task listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskQuery {
    /// Only tasks due on this day
    #[serde(default)]
    pub date: NullDate,
}
