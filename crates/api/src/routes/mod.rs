pub mod health;
pub mod todos;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// ```text
/// GET    /welcome         -> welcome
/// POST   /todos/          -> create
/// GET    /todos/          -> get_placeholder
/// GET    /todos/{id}      -> get_by_id
/// ```
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/welcome", get(handlers::welcome::welcome))
        .merge(todos::router())
}
