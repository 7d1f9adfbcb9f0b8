#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use concept_service::config::{
    ConceptConfig, CorsConfig, GeminiSettings, ProviderConfig, ProviderKind, VertexSettings,
};
use concept_service::services::providers::MockTextProvider;
use concept_service::services::ModelHandle;
use concept_service::startup::{build_router, Application, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub fn router_with(provider: Arc<MockTextProvider>) -> Router {
    build_router(
        AppState::new(ModelHandle::Ready(provider)),
        &CorsConfig::default(),
    )
}

pub fn unavailable_router() -> Router {
    build_router(
        AppState::new(ModelHandle::Unavailable {
            reason: "GEMINI_API_KEY is not set".to_string(),
        }),
        &CorsConfig::default(),
    )
}

pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn post_analyze(router: Router, body: &str) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub fn test_config(kind: ProviderKind) -> ConceptConfig {
    let mut common = service_core::config::Config::default();
    common.host = "127.0.0.1".to_string();
    common.port = 0;

    ConceptConfig {
        common,
        provider: ProviderConfig {
            kind,
            model: "gemini-2.0-flash".to_string(),
            gemini: GeminiSettings {
                api_key: None,
                api_base: "http://127.0.0.1:1".to_string(),
            },
            vertex: VertexSettings {
                credentials_json: None,
                credentials_path: None,
                project_id: None,
                location: "us-central1".to_string(),
                api_base: None,
            },
        },
        cors: CorsConfig::default(),
        otlp_endpoint: None,
    }
}

pub struct TestApp {
    pub address: String,
    pub model_ready: bool,
}

impl TestApp {
    pub async fn spawn(config: ConceptConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());
        let model_ready = app.model_ready();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to answer.
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            model_ready,
        }
    }
}
