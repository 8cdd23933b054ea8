//! Route definitions for the `/todos` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::todo;
use crate::state::AppState;

/// Todo routes, mounted with and without the trailing slash.
pub fn router() -> Router<AppState> {
    let collection = get(todo::get_placeholder).post(todo::create);
    Router::new()
        .route("/todos", collection.clone())
        .route("/todos/", collection)
        .route("/todos/{id}", get(todo::get_by_id))
}
