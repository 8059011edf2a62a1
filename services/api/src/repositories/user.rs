//! User repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use common::{
    database::with_transaction,
    error::{RepositoryError, RepositoryResult},
};
use sqlx::{MySqlPool, Row, mysql::MySqlRow};
use tracing::info;

use super::UserRepository;
use crate::models::{NullString, Token, User};

/// User repository backed by MySQL
#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &MySqlRow) -> RepositoryResult<User> {
    let password: Option<String> = row.try_get("password")?;
    Ok(User {
        id: NullString::from(row.try_get::<Option<String>, _>("id")?),
        name: NullString::from(row.try_get::<Option<String>, _>("name")?),
        password: password.map(Token::hashed).unwrap_or_default(),
        email: NullString::from(row.try_get::<Option<String>, _>("email")?),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<User> {
        info!("Creating new user: {:?}", user.id.as_deref());

        let mut created = user.clone();
        let now = Utc::now();
        created.created_at = Some(now);
        created.updated_at = Some(now);

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                sqlx::query(
                    r#"
                    INSERT INTO users (id, name, password, email, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(created.id.as_deref())
                .bind(created.name.as_deref())
                .bind(created.password.as_deref())
                .bind(created.email.as_deref())
                .bind(created.created_at)
                .bind(created.updated_at)
                .execute(&mut **tx)
                .await?;

                Ok::<_, RepositoryError>(created)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<User> {
        info!("Finding user by ID: {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, name, password, email, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        user_from_row(&row)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<User> {
        info!("Finding user by email: {}", email);

        let row = sqlx::query(
            r#"
            SELECT id, name, password, email, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        user_from_row(&row)
    }

    async fn update(&self, user: &User) -> RepositoryResult<User> {
        info!("Updating user: {:?}", user.id.as_deref());

        let mut merged = user.clone();

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let row = sqlx::query(
                    r#"
                    SELECT id, name, password, email, created_at, updated_at
                    FROM users
                    WHERE id = ?
                    FOR UPDATE
                    "#,
                )
                .bind(merged.id.as_deref())
                .fetch_optional(&mut **tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

                let existing = user_from_row(&row)?;
                merged.fill_unset_from(&existing);
                merged.updated_at = Some(Utc::now());

                sqlx::query(
                    r#"
                    UPDATE users
                    SET name = ?, password = ?, email = ?, updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(merged.name.as_deref())
                .bind(merged.password.as_deref())
                .bind(merged.email.as_deref())
                .bind(merged.updated_at)
                .bind(merged.id.as_deref())
                .execute(&mut **tx)
                .await?;

                Ok::<_, RepositoryError>(merged)
            })
        })
        .await
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        info!("Deleting user: {}", id);

        let id = id.to_string();

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                sqlx::query("SELECT id FROM users WHERE id = ? FOR UPDATE")
                    .bind(&id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(RepositoryError::NotFound)?;

                sqlx::query("DELETE FROM users WHERE id = ?")
                    .bind(&id)
                    .execute(&mut **tx)
                    .await?;

                Ok::<_, RepositoryError>(())
            })
        })
        .await
    }
}
