//! In-memory store for handler tests
//!
//! Emulates the constraints the MySQL schema enforces (NOT NULL columns,
//! unique email, task owner foreign key with cascading delete) and reports
//! them with the same error codes, so the layers above see the same errors
//! they would get from the real store. Emails compare case-insensitively,
//! like the default collation of the `users.email` column.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::error::{
    ER_BAD_NULL, ER_DUP_ENTRY, ER_NO_REFERENCED_ROW, RepositoryError, RepositoryResult,
};
use tokio::sync::Mutex;

use super::{TaskRepository, UserRepository};
use crate::models::{Task, User};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    tasks: HashMap<String, Task>,
}

/// Shared in-memory tables implementing both repository traits
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

fn not_null(column: &str) -> RepositoryError {
    RepositoryError::constraint(ER_BAD_NULL, format!("Column '{}' cannot be null", column))
}

fn same_email(user: &User, email: &str) -> bool {
    user.email
        .as_deref()
        .is_some_and(|stored| stored.eq_ignore_ascii_case(email))
}

fn require(value: Option<&str>, column: &str) -> RepositoryResult<String> {
    value.map(str::to_string).ok_or_else(|| not_null(column))
}

impl Tables {
    fn check_unique_email(&self, id: &str, email: &str) -> RepositoryResult<()> {
        let taken = self
            .users
            .values()
            .any(|u| same_email(u, email) && u.id.as_deref() != Some(id));
        if taken {
            return Err(RepositoryError::constraint(
                ER_DUP_ENTRY,
                format!("Duplicate entry '{}' for key 'users.email'", email),
            ));
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored copy of a task regardless of owner, for assertions
    pub async fn task(&self, id: &str) -> Option<Task> {
        self.tables.lock().await.tasks.get(id).cloned()
    }

    /// Stored copy of a user, for assertions
    pub async fn user(&self, id: &str) -> Option<User> {
        self.tables.lock().await.users.get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> RepositoryResult<User> {
        let mut tables = self.tables.lock().await;

        let id = require(user.id.as_deref(), "id")?;
        require(user.name.as_deref(), "name")?;
        require(user.password.as_deref(), "password")?;
        let email = require(user.email.as_deref(), "email")?;
        if tables.users.contains_key(&id) {
            return Err(RepositoryError::constraint(
                ER_DUP_ENTRY,
                format!("Duplicate entry '{}' for key 'users.PRIMARY'", id),
            ));
        }
        tables.check_unique_email(&id, &email)?;

        let mut created = user.clone();
        let now = Utc::now();
        created.created_at = Some(now);
        created.updated_at = Some(now);
        tables.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<User> {
        let tables = self.tables.lock().await;
        tables.users.get(id).cloned().ok_or(RepositoryError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<User> {
        let tables = self.tables.lock().await;
        tables
            .users
            .values()
            .find(|u| same_email(u, email))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, user: &User) -> RepositoryResult<User> {
        let mut tables = self.tables.lock().await;

        let id = user.id.as_deref().ok_or(RepositoryError::NotFound)?;
        let existing = tables.users.get(id).ok_or(RepositoryError::NotFound)?;

        let mut merged = user.clone();
        merged.fill_unset_from(existing);
        merged.updated_at = Some(Utc::now());
        if let Some(email) = merged.email.as_deref() {
            tables.check_unique_email(id, email)?;
        }

        tables.users.insert(id.to_string(), merged.clone());
        Ok(merged)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut tables = self.tables.lock().await;
        tables.users.remove(id).ok_or(RepositoryError::NotFound)?;
        tables.tasks.retain(|_, t| t.user_id.as_deref() != Some(id));
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn create(&self, task: &Task) -> RepositoryResult<Task> {
        let mut tables = self.tables.lock().await;

        let id = require(task.id.as_deref(), "id")?;
        require(task.title.as_deref(), "title")?;
        let owner = require(task.user_id.as_deref(), "user_id")?;
        if task.date.is_null() {
            return Err(not_null("date"));
        }
        if !tables.users.contains_key(&owner) {
            return Err(RepositoryError::constraint(
                ER_NO_REFERENCED_ROW,
                "Cannot add or update a child row: a foreign key constraint fails",
            ));
        }

        let mut created = task.clone();
        let now = Utc::now();
        created.is_completed = Some(task.completed());
        created.created_at = Some(now);
        created.updated_at = Some(now);
        tables.tasks.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &str, user_id: &str) -> RepositoryResult<Task> {
        let tables = self.tables.lock().await;
        tables
            .tasks
            .get(id)
            .filter(|t| t.user_id.as_deref() == Some(user_id))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Task>> {
        let tables = self.tables.lock().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| t.user_id.as_deref() == Some(user_id))
            .filter(|t| date.is_none() || t.date.value() == date.as_ref())
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            (a.date.value(), a.created_at).cmp(&(b.date.value(), b.created_at))
        });
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> RepositoryResult<Task> {
        let mut tables = self.tables.lock().await;

        let (Some(id), Some(owner)) = (task.id.as_deref(), task.user_id.as_deref()) else {
            return Err(RepositoryError::NotFound);
        };
        let existing = tables
            .tasks
            .get(id)
            .filter(|t| t.user_id.as_deref() == Some(owner))
            .ok_or(RepositoryError::NotFound)?;

        let mut merged = task.clone();
        merged.fill_unset_from(existing);
        merged.updated_at = Some(Utc::now());
        tables.tasks.insert(id.to_string(), merged.clone());
        Ok(merged)
    }

    async fn delete(&self, id: &str, user_id: &str) -> RepositoryResult<()> {
        let mut tables = self.tables.lock().await;
        let owned = tables
            .tasks
            .get(id)
            .is_some_and(|t| t.user_id.as_deref() == Some(user_id));
        if !owned {
            return Err(RepositoryError::NotFound);
        }
        tables.tasks.remove(id);
        Ok(())
    }
}

mod tests {
    use super::*;
    use crate::models::Token;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (id, email) in [("ua", "a@example.com"), ("ub", "b@example.com")] {
            let mut user = User::new(id, id, "", email);
            user.password = Token::hashed("$argon2id$hash");
            UserRepository::create(&store, &user).await.unwrap();
        }
        let task = Task::new("ta1", "taskA1", "I am ContentA1.", "ua", "2020-12-08").unwrap();
        TaskRepository::create(&store, &task).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_other_users_task_is_not_found() {
        let store = seeded().await;

        assert!(matches!(
            TaskRepository::find_by_id(&store, "ta1", "ub").await,
            Err(RepositoryError::NotFound)
        ));

        let mut hijack = Task::new("ta1", "stolen", "", "ub", "").unwrap();
        hijack.is_completed = None;
        assert!(matches!(
            TaskRepository::update(&store, &hijack).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            TaskRepository::delete(&store, "ta1", "ub").await,
            Err(RepositoryError::NotFound)
        ));

        let stored = store.task("ta1").await.unwrap();
        assert_eq!(stored.title.as_deref(), Some("taskA1"));
    }

    #[tokio::test]
    async fn test_constraints() {
        let store = seeded().await;

        let mut duplicate = User::new("uc", "userC", "", "a@example.com");
        duplicate.password = Token::hashed("$argon2id$hash");
        let err = UserRepository::create(&store, &duplicate).await.unwrap_err();
        assert!(err.violation().unwrap().is_duplicate_entry());

        let untitled = Task::new("ta2", "", "", "ua", "2020-12-08").unwrap();
        let err = TaskRepository::create(&store, &untitled).await.unwrap_err();
        assert!(err.violation().unwrap().is_not_null());

        let orphan = Task::new("tx", "orphan", "", "nobody", "2020-12-08").unwrap();
        let err = TaskRepository::create(&store, &orphan).await.unwrap_err();
        assert!(err.violation().unwrap().is_foreign_key());
    }

    #[tokio::test]
    async fn test_email_comparison_ignores_case() {
        let store = seeded().await;

        let mut shouting = User::new("uc", "userC", "", "A@Example.COM");
        shouting.password = Token::hashed("$argon2id$hash");
        let err = UserRepository::create(&store, &shouting).await.unwrap_err();
        assert!(err.violation().unwrap().is_duplicate_entry());

        let found = UserRepository::find_by_email(&store, "A@EXAMPLE.COM")
            .await
            .unwrap();
        assert_eq!(found.id.as_deref(), Some("ua"));
    }

    #[tokio::test]
    async fn test_delete_user_cascades_to_tasks() {
        let store = seeded().await;
        UserRepository::delete(&store, "ua").await.unwrap();
        assert!(store.task("ta1").await.is_none());
    }
}
