use std::sync::Arc;

use seed_db::SessionManager;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Process-wide session manager; handlers open one session per request.
    pub sessions: Arc<SessionManager>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
