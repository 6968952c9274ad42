// tests/evaluate_tests.rs
//
// Exercises the primary evaluation path against a stub chat-completions
// server, and its degradation to the heuristic scorer.

use std::sync::Arc;

use axum::{Json, Router, routing::post};

use promptmaster_backend::config::Config;
use promptmaster_backend::evaluator::PromptEvaluator;
use promptmaster_backend::routes;
use promptmaster_backend::seed;
use promptmaster_backend::state::AppState;
use promptmaster_backend::storage::MemStorage;

/// Stub upstream that answers every chat-completion request with the given
/// message content.
async fn spawn_stub_groq(content: &'static str) -> String {
    let app = Router::new().route(
        "/chat/completions",
        post(move || async move {
            Json(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": content } }
                ]
            }))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

/// Spawns the app configured to call the given upstream URL.
async fn spawn_app(groq_api_url: String) -> String {
    let config = Config {
        database_url: String::new(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        port: 0,
        groq_api_key: Some("test-key".to_string()),
        groq_api_url,
        groq_model: "llama-3.3-70b-versatile".to_string(),
        groq_timeout_secs: 2,
        point_award: 10,
        max_score: 10.0,
    };

    let modules = seed::builtin_modules().expect("embedded catalog must parse");
    let store = Arc::new(MemStorage::new(modules));
    let evaluator = Arc::new(PromptEvaluator::from_config(&config));

    let state = AppState {
        store,
        evaluator,
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn evaluate(client: &reqwest::Client, address: &str) -> serde_json::Value {
    let response = client
        .post(format!("{}/api/evaluate", address))
        .json(&serde_json::json!({
            "userPrompt": "Write a poem.",
            "moduleId": "zero-shot",
            "exerciseId": "zs-1"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    response.json().await.unwrap()
}

#[tokio::test]
async fn upstream_feedback_is_used_when_parseable() {
    // Arrange: upstream wraps its JSON in prose
    let upstream = spawn_stub_groq(
        "Here is my evaluation:\n\
         {\"score\": 9, \"suggestions\": [\"Tighten the wording\", \"Specify the output format\"]}\n\
         Hope that helps!",
    )
    .await;
    let address = spawn_app(upstream).await;
    let client = reqwest::Client::new();

    // Act
    let feedback = evaluate(&client, &address).await;

    // Assert: the upstream score, not the heuristic one
    assert_eq!(feedback["score"], 9.0);
    let suggestions = feedback["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert!(
        !suggestions
            .iter()
            .any(|s| s.as_str().unwrap().contains("simplified evaluation"))
    );
}

#[tokio::test]
async fn malformed_upstream_body_degrades_to_heuristic() {
    // Arrange: upstream answers with prose only
    let upstream = spawn_stub_groq("I would rate this prompt a solid 7 out of 10.").await;
    let address = spawn_app(upstream).await;
    let client = reqwest::Client::new();

    // Act
    let feedback = evaluate(&client, &address).await;

    // Assert: heuristic score for "Write a poem." against zs-1
    assert_eq!(feedback["score"], 5.0);
    assert!(
        feedback["suggestions"]
            .as_array()
            .unwrap()
            .last()
            .unwrap()
            .as_str()
            .unwrap()
            .contains("simplified evaluation")
    );
}

#[tokio::test]
async fn unreachable_upstream_degrades_to_heuristic() {
    // Arrange: nothing listens on the upstream address
    let address = spawn_app("http://127.0.0.1:1".to_string()).await;
    let client = reqwest::Client::new();

    // Act
    let feedback = evaluate(&client, &address).await;

    // Assert
    assert_eq!(feedback["score"], 5.0);
    assert!(
        feedback["suggestions"]
            .as_array()
            .unwrap()
            .last()
            .unwrap()
            .as_str()
            .unwrap()
            .contains("simplified evaluation")
    );
}

#[tokio::test]
async fn wrong_field_types_degrade_to_heuristic() {
    // Arrange: braces present but the shape is wrong
    let upstream = spawn_stub_groq("{\"score\": \"excellent\", \"suggestions\": \"none\"}").await;
    let address = spawn_app(upstream).await;
    let client = reqwest::Client::new();

    // Act
    let feedback = evaluate(&client, &address).await;

    // Assert
    assert_eq!(feedback["score"], 5.0);
}
