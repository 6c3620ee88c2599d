use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{metrics::SSE_CONNECTIONS_ACTIVE, models::grade::GradeEvent, services::AppState};

/// SSE endpoint for grade events of one problem
/// GET /api/v1/problems/{problem_id}/grades/stream
pub async fn grade_stream(
    State(state): State<Arc<AppState>>,
    Path(problem_id): Path<String>,
) -> impl IntoResponse {
    tracing::info!("Client connected to grade stream: problem={}", problem_id);

    let stream = create_grade_stream(problem_id, state.grades.subscribe());
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Decrements the connection gauge when the stream is dropped.
struct ConnectionGuard;

impl ConnectionGuard {
    fn new() -> Self {
        SSE_CONNECTIONS_ACTIVE.inc();
        Self
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        SSE_CONNECTIONS_ACTIVE.dec();
    }
}

/// Stream of `grade` events for `problem_id`. Ends when the publisher is gone.
fn create_grade_stream(
    problem_id: String,
    receiver: broadcast::Receiver<GradeEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(
        (problem_id, receiver, ConnectionGuard::new()),
        |(problem_id, mut receiver, guard)| async move {
            loop {
                match receiver.recv().await {
                    Ok(grade) if grade.problem_id == problem_id => {
                        let event = Event::default()
                            .event(grade.event_name())
                            .data(grade.to_sse_data());
                        return Some((Ok(event), (problem_id, receiver, guard)));
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "Grade stream lagged: problem={}, skipped={}",
                            problem_id,
                            skipped
                        );
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("Grade stream closed: problem={}", problem_id);
                        return None;
                    }
                }
            }
        },
    )
}
