use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::services::{settings_service::SettingsService, AppState};

use super::service_error;

fn settings_service(state: &AppState) -> SettingsService {
    SettingsService::new(state.store.clone(), state.defaults.clone())
}

/// GET /api/v1/problems/{problem_id}/settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Path(problem_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Getting settings: problem={}", problem_id);

    let settings = settings_service(&state)
        .get_settings(&problem_id)
        .await
        .map_err(|e| service_error("load settings", e))?;

    Ok((StatusCode::OK, Json(settings)))
}

/// PUT /api/v1/problems/{problem_id}/settings
///
/// Keys left out of the body take the configured problem defaults.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path(problem_id): Path<String>,
    Json(authored): Json<Value>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Updating settings: problem={}", problem_id);

    let settings = settings_service(&state)
        .update_settings_partial(&problem_id, authored)
        .await
        .map_err(|e| service_error("save settings", e))?;

    Ok((StatusCode::OK, Json(settings)))
}
