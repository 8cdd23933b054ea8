//! Persistence layer for the seed service.
//!
//! - [`session`]: process-wide [`SessionManager`] and per-request [`Session`]s.
//! - [`entity`]: the `Record` / `Fields` / `Schema` traits that describe how a
//!   type maps to a table.
//! - [`repositories`]: generic `count` / `create` / `get_one` over those traits.
//! - [`models`]: concrete entities (currently `todos`).

pub mod config;
pub mod entity;
pub mod error;
pub mod models;
pub mod repositories;
pub mod session;
pub mod target;

pub use error::DbError;
pub use session::{ManagerState, Session, SessionManager};
pub use target::ConnectionTarget;

pub type DbPool = sqlx::PgPool;

/// Connection pool tuning applied when the session manager builds its engine.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Upper bound on pooled connections (default: `20`).
    pub max_connections: u32,
    /// Log every executed statement (default: `false`).
    pub echo: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 20,
            echo: false,
        }
    }
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
