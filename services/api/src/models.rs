//! Entities and request/response payloads

pub mod nullable;
pub mod task;
pub mod token;
pub mod user;

// Re-export for convenience
pub use nullable::{NullDate, NullString};
pub use task::{Task, TaskQuery, TaskResponse};
pub use token::{CredentialHasher, Token, TokenError};
pub use user::{LoginCredentials, User, UserResponse};
