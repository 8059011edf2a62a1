//! To-do API service
//!
//! Users identify themselves with the `id` cookie and manage their own
//! tasks. Requests flow through controllers, interactors and repositories
//! down to MySQL; `main.rs` wires the pieces together.

pub mod controllers;
pub mod error;
pub mod identity;
pub mod interactors;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod settings;
pub mod state;
