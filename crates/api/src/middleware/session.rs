//! Per-request database session extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use seed_db::Session;

use crate::error::AppError;
use crate::state::AppState;

/// A fresh [`Session`] opened from the application's session manager.
///
/// Anything the handler does not commit is rolled back when the session is
/// closed or dropped at the end of the request.
///
/// ```ignore
/// async fn my_handler(DbSession(mut session): DbSession) -> AppResult<...> {
///     let todo = TodoRepo::get_one(&mut session, id).await?;
/// }
/// ```
pub struct DbSession(pub Session);

impl FromRequestParts<AppState> for DbSession {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.sessions.open_session().await?;
        Ok(DbSession(session))
    }
}
