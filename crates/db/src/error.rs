//! Error type for the persistence layer.

/// PostgreSQL SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for `foreign_key_violation`.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The session manager has not been initialized, or has been shut down.
    #[error("Session manager is not initialized")]
    Uninitialized,

    /// `initialize` was called on a manager that already owns an engine.
    #[error("Session manager is already initialized")]
    AlreadyInitialized,

    /// The connection target could not be turned into connect options.
    #[error("Invalid connection target: {0}")]
    InvalidTarget(String),

    #[error("Unique constraint is violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Foreign key constraint is violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// A lookup named a column the record type does not declare.
    #[error("Unknown column '{column}' on table '{table}'")]
    UnknownColumn {
        table: &'static str,
        column: String,
    },

    /// Any other storage failure, passed through unchanged.
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl DbError {
    /// Translate constraint violations into their dedicated variants.
    ///
    /// Everything else is wrapped as [`DbError::Storage`] untouched.
    pub fn classify(err: sqlx::Error) -> Self {
        let (code, constraint) = match &err {
            sqlx::Error::Database(db_err) => (
                db_err.code().map(|c| c.into_owned()),
                db_err.constraint().unwrap_or("unknown").to_string(),
            ),
            _ => (None, String::new()),
        };

        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => DbError::UniqueViolation { constraint },
            Some(FOREIGN_KEY_VIOLATION) => DbError::ForeignKeyViolation { constraint },
            _ => DbError::Storage(err),
        }
    }

    /// True for the two constraint variants a caller can recover from.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. }
        )
    }

    /// True for misuse of the session manager lifecycle.
    pub fn is_manager_state(&self) -> bool {
        matches!(self, DbError::Uninitialized | DbError::AlreadyInitialized)
    }
}
