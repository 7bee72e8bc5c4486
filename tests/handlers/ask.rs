//! Free-text question endpoint tests

use crate::common::{Behavior, RecordingProvider, TestApp};
use chrono::TimeDelta;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_ask_returns_answer_and_new_session() {
    let app = TestApp::new().await;

    let response = app.client
        .post(&app.url("/api/v1/ask"))
        .json(&json!({
            "role": "I'm a Tech Lead",
            "question": "What is X?"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "succeeded");
    assert_eq!(body["text"], "ANSWER");
    assert_eq!(body["role"], "I'm a Tech Lead");
    assert_eq!(body["question"], "What is X?");
    assert!(body["session_id"].as_str().is_some());

    let request = app.provider.last_request();
    assert!(request.system_prompt().contains("Tech Lead"));
    assert_eq!(request.user_prompt(), "What is X?");
}

#[tokio::test]
async fn test_ask_empty_question_is_400_without_provider_call() {
    let app = TestApp::new().await;

    for question in ["", "    "] {
        let response = app.client
            .post(&app.url("/api/v1/ask"))
            .json(&json!({ "role": "I'm a Tech Lead", "question": question }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["code"], "EMPTY_QUESTION");
    }

    assert_eq!(app.provider.calls(), 0);
    // Rejected questions do not open sessions
    assert_eq!(app.state.history.session_count(), 0);
}

#[tokio::test]
async fn test_ask_provider_failure_is_data_not_error() {
    let app = TestApp::with_provider(RecordingProvider::failing("401 Unauthorized")).await;

    let response = app.client
        .post(&app.url("/api/v1/ask"))
        .json(&json!({ "role": "I'm an API Tester", "question": "Why?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["kind"], "provider");
    assert!(body["message"].as_str().unwrap().starts_with("Sorry"));
    assert!(body["detail"].as_str().unwrap().contains("401 Unauthorized"));
}

#[tokio::test]
async fn test_ask_invalid_options_is_400() {
    let app = TestApp::new().await;

    let response = app.client
        .post(&app.url("/api/v1/ask"))
        .json(&json!({
            "role": "I'm an API Tester",
            "question": "Why?",
            "options": { "max_output_tokens": 0 }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["fields"]["max_output_tokens"].is_string());
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn test_ask_with_unknown_session_is_404() {
    let app = TestApp::new().await;

    let response = app.client
        .post(&app.url("/api/v1/ask"))
        .json(&json!({
            "role": "I'm an API Tester",
            "question": "Why?",
            "session_id": uuid::Uuid::now_v7()
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn test_ask_records_history_in_given_session() {
    let app = TestApp::new().await;
    let session_id = app.state.history.create_session().await;

    for question in ["First?", "Second?"] {
        let response = app.client
            .post(&app.url("/api/v1/ask"))
            .json(&json!({
                "role": "Product Manager",
                "question": question,
                "session_id": session_id
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["session_id"], session_id.to_string());
    }

    let entries = app.state.history.entries(&session_id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].question, "First?");
    assert_eq!(entries[1].question, "Second?");
}

#[tokio::test]
async fn test_anonymous_sessions_are_reclaimed_when_idle() {
    let app = TestApp::new().await;

    for i in 0..50 {
        let response = app.client
            .post(&app.url("/api/v1/ask"))
            .json(&json!({ "role": "Tester", "question": format!("Q{i}?") }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }
    assert_eq!(app.state.history.session_count(), 50);

    // Fresh sessions survive a sweep with a realistic TTL
    assert_eq!(app.state.history.evict_idle(TimeDelta::hours(1)).await, 0);

    assert_eq!(app.state.history.evict_idle(TimeDelta::zero()).await, 50);
    assert_eq!(app.state.history.session_count(), 0);
}

#[tokio::test]
async fn test_answer_returned_when_session_ends_mid_call() {
    let app = TestApp::with_provider(RecordingProvider::new(Behavior::Delay(
        Duration::from_millis(500),
        "late answer".to_string(),
    )))
    .await;
    let session_id = app.state.history.create_session().await;

    let client = app.client.clone();
    let url = app.url("/api/v1/ask");
    let pending = tokio::spawn(async move {
        client
            .post(&url)
            .json(&json!({
                "role": "Tester",
                "question": "Still there?",
                "session_id": session_id
            }))
            .send()
            .await
            .unwrap()
    });

    // End the session while the provider is still answering
    tokio::time::sleep(Duration::from_millis(100)).await;
    app.state.history.end_session(&session_id).await.unwrap();

    let response = pending.await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "succeeded");
    assert_eq!(body["text"], "late answer");
    assert!(!app.state.history.contains(&session_id).await);
}
