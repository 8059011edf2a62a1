//! Task use cases
//!
//! Every operation is scoped by the owner id the controller resolved from the
//! caller's identity; another user's task is simply not found.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::{InteractorError, InteractorResult};
use crate::{models::Task, repositories::TaskRepository};

#[derive(Clone)]
pub struct TaskInteractor {
    repository: Arc<dyn TaskRepository>,
}

impl TaskInteractor {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Create a task for `task.user_id`.
    ///
    /// Title, owner and date are required and the id must not be supplied.
    /// The completion flag defaults to `false`.
    pub async fn create(&self, mut task: Task) -> InteractorResult<Task> {
        if !task.id.is_null() {
            return Err(InteractorError::invalid("id must not be supplied"));
        }
        if task.title.is_null() || task.user_id.is_null() || task.date.is_null() {
            return Err(InteractorError::invalid("title, owner and date are required"));
        }

        task.assign_new_id();
        task.is_completed.get_or_insert(false);

        let created = self.repository.create(&task).await?;
        info!(
            "Created task {:?} for user {:?}",
            created.id.as_deref(),
            created.user_id.as_deref()
        );
        Ok(created)
    }

    pub async fn get(&self, id: &str, user_id: &str) -> InteractorResult<Task> {
        Ok(self.repository.find_by_id(id, user_id).await?)
    }

    /// The owner's tasks, optionally only those due on `date`
    pub async fn list(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
    ) -> InteractorResult<Vec<Task>> {
        Ok(self.repository.find_by_user(user_id, date).await?)
    }

    /// Change the fields present in `task`; the rest keep their stored values
    pub async fn update(&self, task: Task) -> InteractorResult<Task> {
        if task.id.is_null() || task.user_id.is_null() {
            return Err(InteractorError::invalid("task id and owner are required"));
        }
        if !task.has_changes() {
            return Err(InteractorError::invalid("nothing to update"));
        }

        Ok(self.repository.update(&task).await?)
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> InteractorResult<()> {
        self.repository.delete(id, user_id).await?;
        info!("Deleted task {} of user {}", id, user_id);
        Ok(())
    }
}
