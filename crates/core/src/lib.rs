//! Shared primitives for the seed service: id/timestamp aliases, the domain
//! error type, and environment-driven configuration helpers.

pub mod config;
pub mod error;
pub mod types;
