use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The host page embedding the problem may live on another origin.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .nest("/api/v1/problems", problems_routes().layer(cors))
        .with_state(app_state)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn problems_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/{problem_id}/settings",
            get(handlers::problems::get_settings).put(handlers::problems::update_settings),
        )
        .route(
            "/{problem_id}/grades/stream",
            get(handlers::sse::grade_stream),
        )
        .route(
            "/{problem_id}/students/{student_id}",
            get(handlers::student::get_view),
        )
        .route(
            "/{problem_id}/students/{student_id}/submit",
            post(handlers::student::submit_answer),
        )
        .route(
            "/{problem_id}/students/{student_id}/save",
            post(handlers::student::save_answer),
        )
        .route(
            "/{problem_id}/students/{student_id}/hint",
            post(handlers::student::request_hint),
        )
}
