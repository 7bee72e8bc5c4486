//! Canned-answer endpoint tests

use crate::common::{
    DESIGN_STANDARDS_QUESTION, DESIGNER, TESTER, TestApp, answer_path, query_string, questions_path,
};

#[tokio::test]
async fn test_list_roles() {
    let app = TestApp::new().await;

    let response = app.client
        .get(&app.url("/api/v1/roles"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let roles = body["roles"].as_array().unwrap();
    assert_eq!(roles.len(), 7);
    assert_eq!(roles[0]["name"], DESIGNER);
    assert_eq!(roles[0]["question_count"], 5);
    assert!(roles[0]["description"].as_str().unwrap().contains("API standards"));
    assert_eq!(roles[0]["resources"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_questions_for_role() {
    let app = TestApp::new().await;

    let response = app.client
        .get(&app.url(&questions_path(DESIGNER)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["role"], DESIGNER);
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 5);
    assert_eq!(questions[0], DESIGN_STANDARDS_QUESTION);
}

#[tokio::test]
async fn test_list_questions_unknown_role_is_404() {
    let app = TestApp::new().await;

    let response = app.client
        .get(&app.url(&questions_path("I'm a Pirate")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "UNKNOWN_ROLE");
}

#[tokio::test]
async fn test_get_answer_returns_exact_text() {
    let app = TestApp::new().await;
    let expected = app
        .state
        .catalog
        .get_answer(DESIGNER, DESIGN_STANDARDS_QUESTION)
        .unwrap()
        .to_string();

    let response = app.client
        .get(&app.url(&answer_path(DESIGNER, DESIGN_STANDARDS_QUESTION)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["role"], DESIGNER);
    assert_eq!(body["question"], DESIGN_STANDARDS_QUESTION);
    assert_eq!(body["answer"].as_str().unwrap(), expected);
    // Canned answers never touch the provider
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn test_get_answer_under_wrong_role_is_404() {
    let app = TestApp::new().await;

    let response = app.client
        .get(&app.url(&answer_path(TESTER, DESIGN_STANDARDS_QUESTION)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "UNKNOWN_QUESTION");
}

#[tokio::test]
async fn test_get_answer_missing_query_is_400() {
    let app = TestApp::new().await;

    let response = app.client
        .get(&app.url(&format!("/api/v1/answers?{}", query_string(&[("role", DESIGNER)]))))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}
