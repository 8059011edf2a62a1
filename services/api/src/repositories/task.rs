//! Task repository for database operations

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::{
    database::with_transaction,
    error::{RepositoryError, RepositoryResult},
};
use sqlx::{MySqlPool, Row, mysql::MySqlRow};
use tracing::info;

use super::TaskRepository;
use crate::models::{NullDate, NullString, Task};

const TASK_COLUMNS: &str =
    "id, title, content, user_id, is_completed, date, created_at, updated_at";

/// Task repository backed by MySQL
#[derive(Clone)]
pub struct MySqlTaskRepository {
    pool: MySqlPool,
}

impl MySqlTaskRepository {
    /// Create a new task repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn task_from_row(row: &MySqlRow) -> RepositoryResult<Task> {
    Ok(Task {
        id: NullString::from(row.try_get::<Option<String>, _>("id")?),
        title: NullString::from(row.try_get::<Option<String>, _>("title")?),
        content: NullString::from(row.try_get::<Option<String>, _>("content")?),
        user_id: NullString::from(row.try_get::<Option<String>, _>("user_id")?),
        is_completed: Some(row.try_get("is_completed")?),
        date: NullDate::from(row.try_get::<Option<NaiveDate>, _>("date")?),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl TaskRepository for MySqlTaskRepository {
    async fn create(&self, task: &Task) -> RepositoryResult<Task> {
        info!(
            "Creating task {:?} for user {:?}",
            task.id.as_deref(),
            task.user_id.as_deref()
        );

        let mut created = task.clone();
        let now = Utc::now();
        created.is_completed = Some(task.completed());
        created.created_at = Some(now);
        created.updated_at = Some(now);

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                sqlx::query(
                    r#"
                    INSERT INTO tasks
                        (id, title, content, user_id, is_completed, date, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(created.id.as_deref())
                .bind(created.title.as_deref())
                .bind(created.content.as_deref())
                .bind(created.user_id.as_deref())
                .bind(created.completed())
                .bind(created.date.value().copied())
                .bind(created.created_at)
                .bind(created.updated_at)
                .execute(&mut **tx)
                .await?;

                Ok::<_, RepositoryError>(created)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: &str, user_id: &str) -> RepositoryResult<Task> {
        info!("Finding task {} for user {}", id, user_id);

        let row = sqlx::query(&format!(
            "SELECT {} FROM tasks WHERE id = ? AND user_id = ?",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        task_from_row(&row)
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
    ) -> RepositoryResult<Vec<Task>> {
        info!("Listing tasks for user {} (date: {:?})", user_id, date);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM tasks
            WHERE user_id = ? AND (? IS NULL OR date = ?)
            ORDER BY date ASC, created_at ASC
            "#,
            TASK_COLUMNS
        ))
        .bind(user_id)
        .bind(date)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(task_from_row).collect()
    }

    async fn update(&self, task: &Task) -> RepositoryResult<Task> {
        info!(
            "Updating task {:?} for user {:?}",
            task.id.as_deref(),
            task.user_id.as_deref()
        );

        let mut merged = task.clone();

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let row = sqlx::query(&format!(
                    "SELECT {} FROM tasks WHERE id = ? AND user_id = ? FOR UPDATE",
                    TASK_COLUMNS
                ))
                .bind(merged.id.as_deref())
                .bind(merged.user_id.as_deref())
                .fetch_optional(&mut **tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

                let existing = task_from_row(&row)?;
                merged.fill_unset_from(&existing);
                merged.updated_at = Some(Utc::now());

                sqlx::query(
                    r#"
                    UPDATE tasks
                    SET title = ?, content = ?, is_completed = ?, date = ?, updated_at = ?
                    WHERE id = ? AND user_id = ?
                    "#,
                )
                .bind(merged.title.as_deref())
                .bind(merged.content.as_deref())
                .bind(merged.completed())
                .bind(merged.date.value().copied())
                .bind(merged.updated_at)
                .bind(merged.id.as_deref())
                .bind(merged.user_id.as_deref())
                .execute(&mut **tx)
                .await?;

                Ok::<_, RepositoryError>(merged)
            })
        })
        .await
    }

    async fn delete(&self, id: &str, user_id: &str) -> RepositoryResult<()> {
        info!("Deleting task {} for user {}", id, user_id);

        let (id, user_id) = (id.to_string(), user_id.to_string());

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                sqlx::query("SELECT id FROM tasks WHERE id = ? AND user_id = ? FOR UPDATE")
                    .bind(&id)
                    .bind(&user_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(RepositoryError::NotFound)?;

                sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
                    .bind(&id)
                    .bind(&user_id)
                    .execute(&mut **tx)
                    .await?;

                Ok::<_, RepositoryError>(())
            })
        })
        .await
    }
}
