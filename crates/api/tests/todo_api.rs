//! HTTP-level integration tests for the `/v1` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn welcome_returns_greeting(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/v1/welcome").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "Welcome": "to your seed project" })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_todo_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/v1/todos/", json!({ "title": "buy milk" })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "buy milk");
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_without_trailing_slash_is_accepted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/v1/todos", json!({ "title": "walk dog" })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn created_todo_is_readable_by_id(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = body_json(post_json(app, "/v1/todos/", json!({ "title": "Get Me" })).await).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/v1/todos/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "id": id, "title": "Get Me" }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_todo_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/v1/todos/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Todo with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_title_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/v1/todos/", json!({ "title": "" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_body_returns_json_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/v1/todos/", json!({ "name": "no title" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(
        json["error"].as_str().unwrap().contains("title"),
        "error should name the missing field, got: {json}"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_id_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/v1/todos/", json!({ "id": 42, "title": "first" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json(app, "/v1/todos/", json!({ "id": 42, "title": "second" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn collection_get_serves_placeholder_todo(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/v1/todos/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    for (id, title) in [(1, "first"), (2, "second")] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/v1/todos/", json!({ "id": id, "title": title })).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get(app, "/v1/todos/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "id": 2, "title": "second" }));
}
