//! Request handlers.
//!
//! Handlers delegate to the repositories in `seed_db` through a per-request
//! [`DbSession`](crate::middleware::session::DbSession) and map errors via
//! [`AppError`](crate::error::AppError).

pub mod todo;
pub mod welcome;
