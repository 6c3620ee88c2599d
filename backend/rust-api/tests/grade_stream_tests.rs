mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use futures::StreamExt;
use tokio::time::{timeout, Duration};
use tower::ServiceExt;

#[tokio::test]
async fn test_grade_stream_delivers_scored_submissions() {
    let app = common::create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/problems/p-stream/grades/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

    // Another problem's grade must not show up.
    common::submit(&app, "p-other", "alice", "10").await;
    common::submit(&app, "p-stream", "alice", "9").await;

    let mut frames = response.into_body().into_data_stream();
    let frame = timeout(Duration::from_secs(1), frames.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();

    assert!(text.contains("event: grade"), "unexpected frame: {}", text);
    assert!(text.contains("\"problem_id\":\"p-stream\""));
    assert!(text.contains("\"value\":0.9"));
    assert!(text.contains("\"max_value\":1"));
}
