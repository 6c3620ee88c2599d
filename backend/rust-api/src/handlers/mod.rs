use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::metrics;
use crate::services::AppState;

pub mod problems;
pub mod sse;
pub mod student;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store_health = match state.store.ping().await {
        Ok(backend) => json!({
            "status": "healthy",
            "backend": backend,
        }),
        Err(e) => json!({
            "status": "unhealthy",
            "error": e.to_string(),
        }),
    };
    let healthy = store_health.get("status").and_then(|v| v.as_str()) == Some("healthy");

    let (status, status_code) = if healthy {
        ("healthy", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "adaptive-numeric-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": { "store": store_health }
        })),
    )
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// Protects /metrics with HTTP Basic Auth against the configured
/// `username:password`.
pub async fn metrics_auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let encoded = auth_header
        .strip_prefix("Basic ")
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let credentials = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

    if credentials != state.config.metrics_auth {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

/// Maps service failures onto the `(StatusCode, String)` error shape every
/// handler returns.
pub(crate) fn service_error(action: &str, e: ServiceError) -> (StatusCode, String) {
    match e {
        ServiceError::Validation(messages) => (StatusCode::BAD_REQUEST, messages.join("\n")),
        ServiceError::Store(e) => {
            tracing::error!("Failed to {}: {}", action, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
