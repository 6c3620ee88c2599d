mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_submit_partial_credit() {
    let app = common::create_test_app();

    let json = common::submit(&app, "p-partial", "alice", "9").await;

    assert_eq!(json["status"], "success");
    assert_eq!(json["feedback_message"], "Answer is within 10.0 percent.");
    assert_eq!(json["feedback_label"], "Correct:");
    assert_eq!(json["indicator_class"], "correct");
    assert_eq!(json["indicator_visibility_class"], "");
    assert_eq!(json["hide_submit_class"], "");
    assert_eq!(json["attempts_message"], "");
    assert_eq!(json["progress_message"], "(9/10 points)");
    assert_eq!(json["saved_message"], "");
    assert_eq!(json["submitted_message"], "");
}

#[tokio::test]
async fn test_submit_exact_answer() {
    let app = common::create_test_app();

    let json = common::submit(&app, "p-exact", "alice", "10").await;

    assert_eq!(json["feedback_message"], "Answer is within 0.0 percent.");
    assert_eq!(json["progress_message"], "(10/10 points)");
}

#[tokio::test]
async fn test_submit_numeric_json_answer() {
    let app = common::create_test_app();

    let (status, json) = common::post_json(
        &app,
        &common::student_uri("p-number", "alice", "submit"),
        json!({ "student_answer": 8 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["progress_message"], "(8/10 points)");
    assert_eq!(json["feedback_message"], "Answer is within 20.0 percent.");
}

#[tokio::test]
async fn test_submit_outside_every_range() {
    let app = common::create_test_app();

    let json = common::submit(&app, "p-miss", "alice", "100").await;

    assert_eq!(json["feedback_message"], "");
    assert_eq!(json["feedback_label"], "");
    assert_eq!(json["indicator_class"], "incorrect");
    assert_eq!(json["progress_message"], "(10 points possible)");
    assert_eq!(json["submitted_message"], "Your submission has been received");
}

#[tokio::test]
async fn test_non_numeric_submission_returns_bare_success() {
    let app = common::create_test_app();
    common::submit(&app, "p-abc", "alice", "9").await;

    let json = common::submit(&app, "p-abc", "alice", "ABC").await;
    assert_eq!(json, json!({ "status": "success" }));

    let (_, view) = common::get(&app, "/api/v1/problems/p-abc/students/alice").await;
    assert_eq!(view["student_answer"], "ABC");
    assert_eq!(view["progress_message"], "(9/10 points)");
    assert_eq!(view["indicator_class"], "correct");
}

#[tokio::test]
async fn test_attempt_limit() {
    let app = common::create_test_app();
    let (status, _) = common::put_json(
        &app,
        "/api/v1/problems/p-limit/settings",
        json!({ "max_attempts": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let first = common::submit(&app, "p-limit", "alice", "9").await;
    assert_eq!(first["attempts_message"], "You have used 1 of 1 submission");
    assert_eq!(first["hide_submit_class"], "nodisplay");

    let second = common::submit(&app, "p-limit", "alice", "10").await;
    assert_eq!(second["attempts_message"], "You have used 1 of 1 submission");
    assert_eq!(second["feedback_message"], "Answer is within 10.0 percent.");
    assert_eq!(second["progress_message"], "(9/10 points)");

    // Other students keep their own attempts.
    let other = common::submit(&app, "p-limit", "bob", "10").await;
    assert_eq!(other["progress_message"], "(10/10 points)");
}

#[tokio::test]
async fn test_custom_feedback_template() {
    let app = common::create_test_app();
    let (status, _) = common::put_json(
        &app,
        "/api/v1/problems/p-template/settings",
        json!({
            "instructor_answer": 10,
            "credit_list": [
                {
                    "error_absolute": 10,
                    "score": 1,
                    "feedback": "%%ANSWER%% %%ERROR_ABSOLUTE%% %%ERROR_PERCENT%% %%STUDENT_ANSWER%% %%STUDENT_ERROR%%"
                }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = common::submit(&app, "p-template", "alice", "9").await;
    assert_eq!(json["feedback_message"], "10.0 10.0 -- 9 1.0");
}

#[tokio::test]
async fn test_hidden_correctness() {
    let app = common::create_test_app();
    common::put_json(
        &app,
        "/api/v1/problems/p-hidden/settings",
        json!({ "display_correctness": false, "weight": 0 }),
    )
    .await;

    let json = common::submit(&app, "p-hidden", "alice", "9").await;
    assert_eq!(json["indicator_class"], "unanswered");
    assert_eq!(json["indicator_visibility_class"], "hidden");
    assert_eq!(json["progress_message"], "");
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = common::create_test_app();
    let request = axum::http::Request::builder()
        .method("POST")
        .uri(common::student_uri("p-bad", "alice", "submit"))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let (status, _) = common::send(&app, request).await;
    assert!(status.is_client_error());
}
