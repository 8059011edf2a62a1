//! Repositories for database operations
//!
//! The traits are the seam between the interactors and the store. The MySQL
//! implementations live in the submodules; every mutating operation runs in a
//! single transaction through [`common::database::with_transaction`].

use async_trait::async_trait;
use chrono::NaiveDate;
use common::error::RepositoryResult;

use crate::models::{Task, User};

#[cfg(test)]
pub mod memory;
pub mod task;
pub mod user;

pub use task::MySqlTaskRepository;
pub use user::MySqlUserRepository;

/// Persistence of users
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user whose id and credential hash are already set
    async fn create(&self, user: &User) -> RepositoryResult<User>;

    /// Find a user by ID
    async fn find_by_id(&self, id: &str) -> RepositoryResult<User>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> RepositoryResult<User>;

    /// Merge unset fields from the stored row and persist the result
    async fn update(&self, user: &User) -> RepositoryResult<User>;

    /// Delete a user by ID
    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// Persistence of tasks; every lookup is scoped by owner
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task whose id is already set
    async fn create(&self, task: &Task) -> RepositoryResult<Task>;

    /// Find one of `user_id`'s tasks
    async fn find_by_id(&self, id: &str, user_id: &str) -> RepositoryResult<Task>;

    /// All of `user_id`'s tasks, optionally only those due on `date`
    async fn find_by_user(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Task>>;

    /// Merge unset fields from the stored row and persist the result
    async fn update(&self, task: &Task) -> RepositoryResult<Task>;

    /// Delete one of `user_id`'s tasks
    async fn delete(&self, id: &str, user_id: &str) -> RepositoryResult<()>;
}
