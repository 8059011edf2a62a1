use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::database::{DatabaseConfig, Profile, init_pool};
use tokio::net::TcpListener;

use todo_api::{
    interactors::{TaskInteractor, UserInteractor},
    repositories::{MySqlTaskRepository, MySqlUserRepository},
    routes,
    settings::Settings,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting to-do API service");

    let settings = Settings::from_env()?;
    let hasher = settings.hash.hasher()?;

    // Initialize database connection pool
    let profile = Profile::from_env()?;
    info!("Using {:?} database profile", profile);
    let db_config = DatabaseConfig::from_env(profile)?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| common::error::DatabaseError::Migration(e.to_string()))?;
    info!("Database migrations applied");

    // Initialize repositories and use cases
    let users = UserInteractor::new(Arc::new(MySqlUserRepository::new(pool.clone())), hasher);
    let tasks = TaskInteractor::new(Arc::new(MySqlTaskRepository::new(pool.clone())));

    let app_state = AppState {
        db_pool: pool,
        users,
        tasks,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let addr = format!("0.0.0.0:{}", settings.routing_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
