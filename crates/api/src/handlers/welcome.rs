use axum::Json;
use serde_json::{json, Value};

/// GET /v1/welcome
pub async fn welcome() -> Json<Value> {
    Json(json!({ "Welcome": "to your seed project" }))
}
