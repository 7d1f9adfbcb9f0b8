//! Provider wire tests against a local HTTP stub.

mod common;

use axum::http::StatusCode;
use common::post_analyze;
use concept_service::config::CorsConfig;
use concept_service::services::providers::{
    GeminiConfig, GeminiTextProvider, ProviderError, ServiceAccountKey, TextProvider,
    VertexConfig, VertexTextProvider,
};
use concept_service::services::ModelHandle;
use concept_service::startup::{build_router, AppState};
use secrecy::Secret;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEMINI_PATH: &str = "/models/gemini-2.0-flash:generateContent";
const VERTEX_PATH: &str =
    "/projects/concept-test/locations/us-central1/publishers/google/models/gemini-2.0-flash:generateContent";

fn gemini(server: &MockServer) -> GeminiTextProvider {
    GeminiTextProvider::new(GeminiConfig {
        api_key: Secret::new("test-key".to_string()),
        model: "gemini-2.0-flash".to_string(),
        api_base: server.uri(),
    })
    .expect("provider builds")
}

fn vertex(server: &MockServer) -> VertexTextProvider {
    let mut credentials =
        ServiceAccountKey::from_json(include_str!("fixtures/service_account.json")).unwrap();
    credentials.token_uri = format!("{}/token", server.uri());

    VertexTextProvider::new(VertexConfig {
        credentials,
        project_id: None,
        location: "us-central1".to_string(),
        model: "gemini-2.0-flash".to_string(),
        api_base: Some(server.uri()),
    })
    .expect("provider builds")
}

fn completion(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5 }
    })
}

#[tokio::test]
async fn gemini_sends_prompt_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("concept extraction engine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{\"language\":\"Go\"}")))
        .expect(1)
        .mount(&server)
        .await;

    let text = gemini(&server)
        .generate_content("You are a computer science concept extraction engine.")
        .await
        .unwrap();

    assert_eq!(text, "{\"language\":\"Go\"}");
}

#[tokio::test]
async fn gemini_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .mount(&server)
        .await;

    let result = gemini(&server).generate_content("prompt").await;

    assert_eq!(result, Err(ProviderError::RateLimited));
}

#[tokio::test]
async fn gemini_http_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    match gemini(&server).generate_content("prompt").await {
        Err(ProviderError::ApiError(msg)) => {
            assert!(msg.contains("400"));
            assert!(msg.contains("API key not valid"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn analyze_route_through_gemini_stub() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("```json\n{\"domain\": \"Databases\"}\n```")),
        )
        .mount(&server)
        .await;

    let router = build_router(
        AppState::new(ModelHandle::Ready(Arc::new(gemini(&server)))),
        &CorsConfig::default(),
    );

    let (status, body) = post_analyze(router, r#"{"code": "SELECT * FROM t"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "domain": "Databases" }));
}

#[tokio::test]
async fn analyze_route_reports_provider_failure_as_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let router = build_router(
        AppState::new(ModelHandle::Ready(Arc::new(gemini(&server)))),
        &CorsConfig::default(),
    );

    let (status, body) = post_analyze(router, r#"{"code": "x"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": "rate limit exceeded" }));
}

#[tokio::test]
async fn vertex_exchanges_token_then_calls_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VERTEX_PATH))
        .and(header("authorization", "Bearer ya29.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("plain words")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = vertex(&server);
    assert!(provider.endpoint().ends_with(VERTEX_PATH));

    let text = provider.generate_content("prompt").await.unwrap();

    assert_eq!(text, "plain words");
}

#[tokio::test]
async fn vertex_token_rejection_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VERTEX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(0)
        .mount(&server)
        .await;

    match vertex(&server).generate_content("prompt").await {
        Err(ProviderError::Authentication(msg)) => assert!(msg.contains("invalid_grant")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn vertex_project_defaults_to_credential_project() {
    let credentials =
        ServiceAccountKey::from_json(include_str!("fixtures/service_account.json")).unwrap();

    let provider = VertexTextProvider::new(VertexConfig {
        credentials,
        project_id: None,
        location: "europe-west4".to_string(),
        model: "gemini-2.0-flash".to_string(),
        api_base: None,
    })
    .unwrap();

    assert_eq!(
        provider.endpoint(),
        "https://europe-west4-aiplatform.googleapis.com/v1/projects/concept-test/locations/europe-west4/publishers/google/models/gemini-2.0-flash:generateContent"
    );
    assert_eq!(provider.model(), "gemini-2.0-flash");
}
