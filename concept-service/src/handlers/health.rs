use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

/// Liveness payload. Succeeds whether or not the model is available.
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Concept Extractor Backend is running",
        "status": "ok"
    }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let model = if state.analyzer.is_ready() {
        "ready"
    } else {
        "unavailable"
    };

    Json(json!({
        "status": "ok",
        "service": "concept-service",
        "version": env!("CARGO_PKG_VERSION"),
        "model": model
    }))
}
