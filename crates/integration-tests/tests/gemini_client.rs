//! `GeminiClient` against a local fake of the `generateContent` API.

use std::sync::Arc;

use axum::http::StatusCode;
use jyoti_core::chat::FALLBACK_REPLY;
use jyoti_core::{GroundingLink, RecommendError, Recommender, SHOP};
use jyoti_integration_tests::{FakeGemini, TestApp};
use jyoti_storefront::services::{GeminiClient, GeminiError};
use serde_json::json;

fn grounded_reply() -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"parts": [
                {"text": "Namaste! "},
                {"text": "Our Motichoor Laddu is made fresh in pure ghee."}
            ]},
            "groundingMetadata": {"groundingChunks": [
                {"maps": {"title": "New Jyoti Sweets", "uri": "https://maps.example/jyoti"}},
                {"maps": {}}
            ]}
        }]
    })
}

#[tokio::test]
async fn test_generate_sends_key_prompt_and_maps_tool() {
    let fake = FakeGemini::ok(grounded_reply()).await;
    let client = GeminiClient::new(&fake.config()).expect("client");

    let recommendation = client
        .generate("Which laddu do you recommend?")
        .await
        .expect("recommendation");

    assert_eq!(
        recommendation.text,
        "Namaste! Our Motichoor Laddu is made fresh in pure ghee."
    );
    assert_eq!(
        recommendation.grounding_links,
        vec![
            GroundingLink::new("New Jyoti Sweets", "https://maps.example/jyoti"),
            GroundingLink::new("View on Maps", SHOP.google_maps_url),
        ]
    );

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    let request = requests.first().expect("captured request");
    assert_eq!(request.path, "/v1beta/models/gemini-test:generateContent");
    assert_eq!(
        request.api_key.as_deref(),
        Some("test-gemini-key-7Qm2xV9pLk4R")
    );
    assert_eq!(
        request.body["contents"][0]["parts"][0]["text"],
        "Which laddu do you recommend?"
    );
    assert_eq!(request.body["tools"], json!([{ "googleMaps": {} }]));
    let system = request.body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .expect("system instruction text");
    assert!(system.contains(SHOP.name));
    assert!(system.contains("Premium Kaju Katli"));
}

#[tokio::test]
async fn test_rate_limit_status_maps_to_rate_limited() {
    let fake = FakeGemini::respond(
        StatusCode::TOO_MANY_REQUESTS,
        vec![("retry-after", "17".to_string())],
        json!({"error": {"message": "quota", "status": "RESOURCE_EXHAUSTED"}}),
    )
    .await;
    let client = GeminiClient::new(&fake.config()).expect("client");

    let err = client.generate("hello").await.expect_err("should fail");
    assert!(matches!(err, GeminiError::RateLimited(17)));

    let err = client.recommend("hello").await.expect_err("should fail");
    assert!(matches!(err, RecommendError::RateLimited));
}

#[tokio::test]
async fn test_api_error_body_is_parsed() {
    let fake = FakeGemini::respond(
        StatusCode::BAD_REQUEST,
        Vec::new(),
        json!({"error": {"message": "model not found", "status": "INVALID_ARGUMENT"}}),
    )
    .await;
    let client = GeminiClient::new(&fake.config()).expect("client");

    match client.generate("hello").await {
        Err(GeminiError::Api { status, message }) => {
            assert_eq!(status, "INVALID_ARGUMENT");
            assert_eq!(message, "model not found");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_service_error() {
    let fake = FakeGemini::respond(StatusCode::FORBIDDEN, Vec::new(), json!({})).await;
    let client = GeminiClient::new(&fake.config()).expect("client");

    let err = client.recommend("hello").await.expect_err("should fail");
    assert!(matches!(err, RecommendError::Service(_)));
}

#[tokio::test]
async fn test_storefront_chat_through_gemini() {
    let fake = FakeGemini::ok(grounded_reply()).await;
    let client = GeminiClient::new(&fake.config()).expect("client");
    let app = TestApp::spawn(Arc::new(client)).await;

    let body = app
        .post_form("/chat", &[("message", "Something sweet please")])
        .await
        .text()
        .await
        .expect("body");
    assert!(body.contains("Our Motichoor Laddu is made fresh in pure ghee."));
    assert!(body.contains("View on Maps"));
    assert_eq!(fake.requests().len(), 1);
}

#[tokio::test]
async fn test_storefront_chat_falls_back_when_gemini_fails() {
    let fake =
        FakeGemini::respond(StatusCode::INTERNAL_SERVER_ERROR, Vec::new(), json!({})).await;
    let client = GeminiClient::new(&fake.config()).expect("client");
    let app = TestApp::spawn(Arc::new(client)).await;

    let body = app
        .post_form("/chat", &[("message", "Hello")])
        .await
        .text()
        .await
        .expect("body");
    assert!(body.contains(FALLBACK_REPLY));
}
