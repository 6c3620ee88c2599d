#![allow(dead_code)]

use adaptive_numeric_api::{
    config::Config, create_router, models::ProblemSettings, services::store::InMemoryStore,
    AppState,
};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const METRICS_AUTH: &str = "metrics:test-secret";

pub fn test_config() -> Config {
    Config {
        metrics_auth: METRICS_AUTH.to_string(),
        ..Config::default()
    }
}

pub fn create_test_app() -> Router {
    create_test_app_with_defaults(ProblemSettings::default())
}

pub fn create_test_app_with_defaults(problem_defaults: ProblemSettings) -> Router {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config {
        problem_defaults,
        ..test_config()
    };
    let app_state = Arc::new(AppState::with_store(config, Arc::new(InMemoryStore::new())));
    create_router(app_state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, json)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub fn student_uri(problem_id: &str, student_id: &str, action: &str) -> String {
    format!(
        "/api/v1/problems/{}/students/{}/{}",
        problem_id, student_id, action
    )
}

pub async fn submit(app: &Router, problem_id: &str, student_id: &str, answer: &str) -> Value {
    let (status, json) = post_json(
        app,
        &student_uri(problem_id, student_id, "submit"),
        serde_json::json!({ "student_answer": answer }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "submit failed: {}", json);
    json
}
