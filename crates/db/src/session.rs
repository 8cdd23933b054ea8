//! Engine ownership and scoped transactional sessions.
//!
//! A [`SessionManager`] owns the single process-wide pool and moves through
//! `Uninitialized -> Initialized -> ShutDown`. Each unit of work borrows a
//! [`Session`], which wraps at most one open transaction at a time. Dropping
//! a session with an open transaction rolls it back, so a cancelled request
//! never leaves a dangling transaction behind.

use futures::future::BoxFuture;
use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use tokio::sync::RwLock;

use crate::error::DbError;
use crate::target::ConnectionTarget;
use crate::{DbPool, PoolSettings};

/// Lifecycle state of a [`SessionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Uninitialized,
    Initialized,
    ShutDown,
}

enum Engine {
    Uninitialized,
    Initialized(DbPool),
    ShutDown,
}

/// Owns the pooled engine and hands out sessions.
///
/// The engine is written only by [`initialize`](Self::initialize) and
/// [`shutdown`](Self::shutdown); request handling only takes read locks.
pub struct SessionManager {
    engine: RwLock<Engine>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Create a manager with no engine yet.
    pub fn new() -> Self {
        Self {
            engine: RwLock::new(Engine::Uninitialized),
        }
    }

    /// Create a manager that is already initialized with `pool`.
    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            engine: RwLock::new(Engine::Initialized(pool)),
        }
    }

    /// Build the engine for `target`.
    ///
    /// The pool connects lazily; a malformed target fails here, an unreachable
    /// server fails on first use.
    pub async fn initialize(
        &self,
        target: &ConnectionTarget,
        settings: &PoolSettings,
    ) -> Result<(), DbError> {
        let mut engine = self.engine.write().await;
        match *engine {
            Engine::Uninitialized => {}
            Engine::Initialized(_) => return Err(DbError::AlreadyInitialized),
            Engine::ShutDown => return Err(DbError::Uninitialized),
        }

        let options = target.connect_options(settings.echo)?;
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_lazy_with(options);

        *engine = Engine::Initialized(pool);
        tracing::info!(
            %target,
            max_connections = settings.max_connections,
            "Session manager initialized"
        );
        Ok(())
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> ManagerState {
        match *self.engine.read().await {
            Engine::Uninitialized => ManagerState::Uninitialized,
            Engine::Initialized(_) => ManagerState::Initialized,
            Engine::ShutDown => ManagerState::ShutDown,
        }
    }

    /// A handle to the pool, for health checks and migrations.
    pub async fn pool(&self) -> Result<DbPool, DbError> {
        match &*self.engine.read().await {
            Engine::Initialized(pool) => Ok(pool.clone()),
            Engine::Uninitialized | Engine::ShutDown => Err(DbError::Uninitialized),
        }
    }

    /// Open a new session. No connection is taken until the first statement.
    pub async fn open_session(&self) -> Result<Session, DbError> {
        Ok(Session::new(self.pool().await?))
    }

    /// Run `work` inside a fresh session.
    ///
    /// On success the session is closed; on error it is rolled back and
    /// closed before the error is returned. Anything `work` did not commit
    /// is discarded either way.
    pub async fn scoped<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T, E>>,
        E: From<DbError>,
    {
        let mut session = self.open_session().await?;
        match work(&mut session).await {
            Ok(value) => {
                session.close().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = session.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback after failed unit of work failed");
                }
                Err(err)
            }
        }
    }

    /// Dispose the engine and release all pooled connections.
    ///
    /// The manager reports `ShutDown` as soon as this is called; closing the
    /// pool then waits for sessions still in flight to release their
    /// connections, without blocking other callers of the manager.
    pub async fn shutdown(&self) -> Result<(), DbError> {
        let pool = {
            let mut engine = self.engine.write().await;
            match std::mem::replace(&mut *engine, Engine::ShutDown) {
                Engine::Initialized(pool) => pool,
                previous => {
                    *engine = previous;
                    return Err(DbError::Uninitialized);
                }
            }
        };

        pool.close().await;
        tracing::info!("Session manager shut down");
        Ok(())
    }
}

/// A scoped transactional handle, owned by one unit of work.
///
/// A transaction is begun lazily by [`connection`](Self::connection) and ends
/// on [`commit`](Self::commit) or [`rollback`](Self::rollback); the next
/// statement after that begins a new one.
pub struct Session {
    pool: DbPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl Session {
    fn new(pool: DbPool) -> Self {
        Self { pool, tx: None }
    }

    /// Whether a transaction is currently open.
    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// The connection of the open transaction, beginning one if needed.
    pub async fn connection(&mut self) -> Result<&mut PgConnection, DbError> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await?,
        };
        Ok(&mut **self.tx.insert(tx))
    }

    /// Commit the open transaction, if any.
    pub async fn commit(&mut self) -> Result<(), DbError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    /// Roll back the open transaction, if any.
    pub async fn rollback(&mut self) -> Result<(), DbError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
            tracing::debug!("Session rolled back");
        }
        Ok(())
    }

    /// Release the session, discarding anything not yet committed.
    pub async fn close(mut self) -> Result<(), DbError> {
        self.rollback().await
    }
}
