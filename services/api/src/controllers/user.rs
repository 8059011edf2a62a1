//! User endpoints

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    identity::{self, CallerId},
    models::{LoginCredentials, User, UserResponse},
    state::AppState,
};

/// Get the calling user
pub async fn get_user(
    State(state): State<AppState>,
    CallerId(id): CallerId,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users.get(&id).await.map_err(ApiError::from_user)?;
    Ok(Json(UserResponse::from(&user)))
}

/// Register a new user and identify the client as them
pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<User>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<UserResponse>)> {
    let Json(user) = payload?;
    let created = state.users.create(user).await.map_err(ApiError::from_user)?;

    let id = created.id.as_deref().unwrap_or_default();
    Ok((
        jar.add(identity::identity_cookie(id)),
        Json(UserResponse::from(&created)),
    ))
}

/// Change the calling user's name, password or email
pub async fn update_user(
    State(state): State<AppState>,
    CallerId(id): CallerId,
    payload: Result<Json<User>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Json(mut user) = payload?;
    user.id.set(id);

    let updated = state.users.update(user).await.map_err(ApiError::from_user)?;
    Ok(Json(UserResponse::from(&updated)))
}

/// Delete the calling user together with their tasks
pub async fn delete_user(
    State(state): State<AppState>,
    CallerId(id): CallerId,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<Value>)> {
    state.users.delete(&id).await.map_err(ApiError::from_user)?;
    Ok((
        identity::forget(jar),
        Json(json!({ "message": "user deleted" })),
    ))
}

/// Exchange email and password for the identity cookie
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginCredentials>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<UserResponse>)> {
    let Json(credentials) = payload?;
    let user = state
        .users
        .authenticate(&credentials)
        .await
        .map_err(ApiError::from_user)?;

    let id = user.id.as_deref().unwrap_or_default();
    info!("User {} logged in", id);
    Ok((
        jar.add(identity::identity_cookie(id)),
        Json(UserResponse::from(&user)),
    ))
}
