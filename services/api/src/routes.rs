//! API service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::{
    controllers::{task, user},
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/user",
            get(user::get_user)
                .post(user::create_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/login", post(user::login))
        .route("/task", get(task::list_tasks).post(task::create_task))
        .route(
            "/task/:id",
            get(task::get_task)
                .put(task::update_task)
                .delete(task::delete_task),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match common::database::health_check(&state.db_pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "todo-api",
                "database": "up"
            })),
        ),
        Err(e) => {
            error!("Database health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "service": "todo-api",
                    "database": "down"
                })),
            )
        }
    }
}
