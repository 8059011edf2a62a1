//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::RepositoryError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::interactors::InteractorError;

/// Custom error type for the API service
///
/// Only fixed messages reach the client; store and hashing details are
/// logged and replaced by a generic 500.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Missing or unknown caller identity
    #[error("unauthorized")]
    Unauthorized,

    /// The addressed resource does not exist for this caller
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Internal server error
    #[error("internal server error")]
    InternalServerError,
}

impl ApiError {
    /// Map a user use-case failure
    pub fn from_user(err: InteractorError) -> Self {
        match err {
            InteractorError::Repository(RepositoryError::Constraint(ref violation))
                if violation.is_duplicate_entry() =>
            {
                ApiError::BadRequest("email already exists".to_string())
            }
            other => Self::classify(other, "user"),
        }
    }

    /// Map a task use-case failure
    pub fn from_task(err: InteractorError) -> Self {
        match err {
            // The owner vanished between identification and insert
            InteractorError::Repository(RepositoryError::Constraint(ref violation))
                if violation.is_foreign_key() =>
            {
                ApiError::Unauthorized
            }
            other => Self::classify(other, "task"),
        }
    }

    fn classify(err: InteractorError, resource: &'static str) -> Self {
        match err {
            InteractorError::Invalid(message) => ApiError::BadRequest(message),
            InteractorError::Unauthenticated => ApiError::Unauthorized,
            InteractorError::Repository(RepositoryError::NotFound) => ApiError::NotFound(resource),
            InteractorError::Repository(RepositoryError::Constraint(violation))
                if violation.is_not_null() =>
            {
                ApiError::BadRequest("bad request".to_string())
            }
            other => {
                error!("Unexpected {} failure: {}", resource, other);
                ApiError::InternalServerError
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest("bad request".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!("Rejected query string: {}", rejection.body_text());
        ApiError::BadRequest("bad request".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "code": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
