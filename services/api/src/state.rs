//! Application state shared across handlers

use sqlx::MySqlPool;

use crate::interactors::{TaskInteractor, UserInteractor};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: MySqlPool,
    pub users: UserInteractor,
    pub tasks: TaskInteractor,
}
