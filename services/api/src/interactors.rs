//! Use cases sitting between the controllers and the repositories
//!
//! Interactors validate what a request asks for, fill in server-side values
//! (identifiers, credential hashes, defaults) and delegate persistence to the
//! repository traits. They hold no state between calls.

use common::error::RepositoryError;
use thiserror::Error;

use crate::models::TokenError;

pub mod task;
pub mod user;

pub use task::TaskInteractor;
pub use user::UserInteractor;

/// Errors raised by the interactors
#[derive(Debug, Error)]
pub enum InteractorError {
    /// The request is missing a required field or carries a forbidden one
    #[error("invalid input: {0}")]
    Invalid(String),

    /// The caller could not prove who they are
    #[error("unauthenticated")]
    Unauthenticated,

    /// Hashing the credential failed
    #[error(transparent)]
    Credential(#[from] TokenError),

    /// The store refused or failed the operation
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl InteractorError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Type alias for interactor results
pub type InteractorResult<T> = Result<T, InteractorError>;
