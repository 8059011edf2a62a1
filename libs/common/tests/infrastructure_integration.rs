//! Integration tests for the store plumbing
//!
//! These tests need a reachable MySQL instance (see `MYSQL_*` and
//! `APP_PROFILE=test`) and are ignored by default. Run them with
//! `cargo test -p common -- --ignored`.

use common::{
    database::{DatabaseConfig, Profile, health_check, init_pool, with_transaction},
    error::RepositoryError,
};
use sqlx::Row;

/// Verifies the pool connects and the transaction helper commits on
/// success and rolls back on failure
#[tokio::test]
#[ignore = "requires a running MySQL instance"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env(Profile::Test)?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    // Temporary tables are per-connection, so the check uses a regular table.
    sqlx::query("CREATE TABLE IF NOT EXISTS tx_scratch (id INT PRIMARY KEY)")
        .execute(&pool)
        .await?;
    sqlx::query("DELETE FROM tx_scratch").execute(&pool).await?;

    with_transaction(&pool, |tx| {
        Box::pin(async move {
            sqlx::query("INSERT INTO tx_scratch (id) VALUES (1)")
                .execute(&mut **tx)
                .await?;
            Ok::<_, RepositoryError>(())
        })
    })
    .await?;

    let failed = with_transaction(&pool, |tx| {
        Box::pin(async move {
            sqlx::query("INSERT INTO tx_scratch (id) VALUES (2)")
                .execute(&mut **tx)
                .await?;
            Err::<(), _>(RepositoryError::NotFound)
        })
    })
    .await;
    assert!(matches!(failed, Err(RepositoryError::NotFound)));

    let row = sqlx::query("SELECT COUNT(*) AS total FROM tx_scratch")
        .fetch_one(&pool)
        .await?;
    let total: i64 = row.try_get("total")?;
    assert_eq!(total, 1, "rolled back insert must not be visible");

    sqlx::query("DROP TABLE tx_scratch").execute(&pool).await?;

    Ok(())
}
