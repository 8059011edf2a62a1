//! Custom error types for the common library
//!
//! This module defines the bootstrap errors raised while configuring and
//! connecting to MySQL, and the error taxonomy every repository maps raw
//! store failures into.

use sqlx::Error as SqlxError;
use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

/// MySQL `ER_BAD_NULL_ERROR`: a NOT NULL column received NULL
pub const ER_BAD_NULL: u16 = 1048;
/// MySQL `ER_DUP_ENTRY`: a unique key already holds the value
pub const ER_DUP_ENTRY: u16 = 1062;
/// MySQL `ER_ROW_IS_REFERENCED_2`: a parent row is still referenced
pub const ER_ROW_IS_REFERENCED: u16 = 1451;
/// MySQL `ER_NO_REFERENCED_ROW_2`: a foreign key points to no parent row
pub const ER_NO_REFERENCED_ROW: u16 = 1452;

/// Custom error type for database bootstrap operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// A constraint the store refused to violate, carrying the engine's
/// numeric error code and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub code: u16,
    pub message: String,
}

impl ConstraintViolation {
    /// Build a violation from a code and message
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether a unique key (such as `users.email`) rejected the write
    pub fn is_duplicate_entry(&self) -> bool {
        self.code == ER_DUP_ENTRY
    }

    /// Whether a NOT NULL column rejected the write
    pub fn is_not_null(&self) -> bool {
        self.code == ER_BAD_NULL
    }

    /// Whether a foreign key rejected the write
    pub fn is_foreign_key(&self) -> bool {
        matches!(self.code, ER_ROW_IS_REFERENCED | ER_NO_REFERENCED_ROW)
    }
}

/// Errors surfaced by repositories
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No row matched the id (and owner) predicate
    #[error("record not found")]
    NotFound,

    /// Unique, not-null or foreign-key violation reported by the store
    #[error("constraint violation {}: {}", .0.code, .0.message)]
    Constraint(ConstraintViolation),

    /// Anything else the store or driver reported
    #[error("repository failure: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Helper for constraint violations
    pub fn constraint(code: u16, message: impl Into<String>) -> Self {
        Self::Constraint(ConstraintViolation::new(code, message))
    }

    /// Helper for unclassified failures
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The violated constraint, if this is a constraint error
    pub fn violation(&self) -> Option<&ConstraintViolation> {
        match self {
            Self::Constraint(violation) => Some(violation),
            _ => None,
        }
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => Self::NotFound,
            SqlxError::Database(db_err) => match db_err.try_downcast_ref::<MySqlDatabaseError>() {
                Some(mysql)
                    if matches!(
                        mysql.number(),
                        ER_BAD_NULL | ER_DUP_ENTRY | ER_ROW_IS_REFERENCED | ER_NO_REFERENCED_ROW
                    ) =>
                {
                    Self::constraint(mysql.number(), mysql.message())
                }
                _ => Self::Internal(db_err.to_string()),
            },
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Type alias for Result with RepositoryError
pub type RepositoryResult<T> = Result<T, RepositoryError>;
