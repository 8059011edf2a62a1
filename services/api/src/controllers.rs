//! HTTP handlers
//!
//! Handlers resolve the caller from the `id` cookie, decode the body, call
//! one interactor operation and translate its outcome through
//! [`crate::error::ApiError`].

pub mod task;
pub mod user;
