//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` record struct matching the database row
//! - A `Deserialize` + `Validate` schema struct bound to that record
pub mod todo;
