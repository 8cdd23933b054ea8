//! Handlers for the `/todos` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use seed_core::error::CoreError;
use seed_core::types::DbId;
use seed_db::models::todo::TodoSchema;
use seed_db::repositories::TodoRepo;
use seed_db::Session;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::session::DbSession;

/// Todo served by the collection GET until a real listing exists.
pub const PLACEHOLDER_TODO_ID: DbId = 2;

/// POST /v1/todos/
pub async fn create(
    DbSession(mut session): DbSession,
    payload: Result<Json<TodoSchema>, JsonRejection>,
) -> AppResult<(StatusCode, Json<TodoSchema>)> {
    let Json(input) = payload?;
    input.validate()?;
    let todo = TodoRepo::create(&mut session, &input, true).await?;
    session.close().await?;
    tracing::debug!(id = ?todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /v1/todos/
pub async fn get_placeholder(DbSession(session): DbSession) -> AppResult<Json<TodoSchema>> {
    fetch(session, PLACEHOLDER_TODO_ID).await
}

/// GET /v1/todos/{id}
pub async fn get_by_id(
    DbSession(session): DbSession,
    Path(id): Path<DbId>,
) -> AppResult<Json<TodoSchema>> {
    fetch(session, id).await
}

async fn fetch(mut session: Session, id: DbId) -> AppResult<Json<TodoSchema>> {
    let todo = TodoRepo::get_one(&mut session, id).await?;
    session.close().await?;
    let todo = todo.ok_or(AppError::Core(CoreError::NotFound { entity: "Todo", id }))?;
    Ok(Json(todo))
}
