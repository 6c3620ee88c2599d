use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    models::{
        answer::{SaveAnswerRequest, SubmitAnswerRequest},
        StudentKey,
    },
    services::{answer_service::AnswerService, hint_service::HintService, AppState},
};

use super::service_error;

fn answer_service(state: &AppState) -> AnswerService {
    AnswerService::new(
        state.store.clone(),
        state.defaults.clone(),
        state.locks.clone(),
        state.grades.clone(),
    )
}

/// GET /api/v1/problems/{problem_id}/students/{student_id}
pub async fn get_view(
    State(state): State<Arc<AppState>>,
    Path((problem_id, student_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = StudentKey::new(problem_id, student_id);
    tracing::info!("Rendering student view: {}", key);

    let view = answer_service(&state)
        .student_view(&key)
        .await
        .map_err(|e| service_error("load student view", e))?;

    Ok((StatusCode::OK, Json(view)))
}

/// POST /api/v1/problems/{problem_id}/students/{student_id}/submit
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path((problem_id, student_id)): Path<(String, String)>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = StudentKey::new(problem_id, student_id);

    let response = answer_service(&state)
        .submit_answer(&key, &req)
        .await
        .map_err(|e| service_error("submit answer", e))?;

    Ok((StatusCode::OK, Json(response)))
}

/// POST /api/v1/problems/{problem_id}/students/{student_id}/save
pub async fn save_answer(
    State(state): State<Arc<AppState>>,
    Path((problem_id, student_id)): Path<(String, String)>,
    Json(req): Json<SaveAnswerRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = StudentKey::new(problem_id, student_id);

    let response = answer_service(&state)
        .save_answer(&key, &req)
        .await
        .map_err(|e| service_error("save answer", e))?;

    Ok((StatusCode::OK, Json(response)))
}

/// POST /api/v1/problems/{problem_id}/students/{student_id}/hint
pub async fn request_hint(
    State(state): State<Arc<AppState>>,
    Path((problem_id, student_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let key = StudentKey::new(problem_id, student_id);

    let hint_service = HintService::new(
        state.store.clone(),
        state.defaults.clone(),
        state.locks.clone(),
    );

    let response = hint_service
        .request_hint(&key)
        .await
        .map_err(|e| service_error("request hint", e))?;

    Ok((StatusCode::OK, Json(response)))
}
