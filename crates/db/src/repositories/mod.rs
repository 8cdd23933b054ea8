//! Repositories over the [`entity`](crate::entity) traits.
//!
//! [`RecordRepo`] works on row types; [`SchemaRepo`] wraps it for the
//! wire-facing schema bound to a record.

pub mod record_repo;
pub mod schema_repo;

pub use record_repo::RecordRepo;
pub use schema_repo::SchemaRepo;

use crate::models::todo::TodoSchema;

/// Repository for the `todos` table, speaking [`TodoSchema`].
pub type TodoRepo = SchemaRepo<TodoSchema>;
