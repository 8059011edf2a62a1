//! Task endpoints; every task is addressed within the caller's own tasks

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde_json::{Value, json};

use crate::{
    error::{ApiError, ApiResult},
    identity::CallerId,
    models::{Task, TaskQuery, TaskResponse},
    state::AppState,
};

/// Create a task owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    payload: Result<Json<Task>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let Json(mut task) = payload?;
    task.user_id.set(user_id);

    let created = state.tasks.create(task).await.map_err(ApiError::from_task)?;
    Ok(Json(TaskResponse::from(&created)))
}

/// List the caller's tasks, optionally for a single day (`?date=YYYY-MM-DD`)
pub async fn list_tasks(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let Query(query) = query?;
    let tasks = state
        .tasks
        .list(&user_id, query.date.into_option())
        .await
        .map_err(ApiError::from_task)?;

    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

pub async fn get_task(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .tasks
        .get(&id, &user_id)
        .await
        .map_err(ApiError::from_task)?;
    Ok(Json(TaskResponse::from(&task)))
}

/// Change the fields present in the body; the rest keep their stored values
pub async fn update_task(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Path(id): Path<String>,
    payload: Result<Json<Task>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let Json(mut task) = payload?;
    task.id.set(id);
    task.user_id.set(user_id);

    let updated = state.tasks.update(task).await.map_err(ApiError::from_task)?;
    Ok(Json(TaskResponse::from(&updated)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state
        .tasks
        .delete(&id, &user_id)
        .await
        .map_err(ApiError::from_task)?;
    Ok(Json(json!({ "message": "task deleted" })))
}
