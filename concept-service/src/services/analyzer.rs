//! Prompt/model adapter: prompt construction, the model call, and result
//! normalization into a [`ServiceResponse`].

use crate::config::{ProviderConfig, ProviderKind};
use crate::dtos::ServiceResponse;
use crate::models::ConceptReport;
use crate::services::prompt::build_prompt;
use crate::services::providers::{
    GeminiConfig, GeminiTextProvider, MockTextProvider, ProviderError, ServiceAccountKey,
    TextProvider, VertexConfig, VertexTextProvider,
};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Error returned for every analysis while no provider could be built.
pub const MODEL_NOT_INITIALIZED: &str = "Gemini model not initialized";

/// Provider handle built once at startup.
#[derive(Clone)]
pub enum ModelHandle {
    Ready(Arc<dyn TextProvider>),
    Unavailable { reason: String },
}

impl ModelHandle {
    /// Build the configured provider. Failures are logged and produce
    /// `Unavailable` so the process still starts.
    pub fn from_config(config: &ProviderConfig) -> Self {
        match build_provider(config) {
            Ok(provider) => {
                tracing::info!(
                    provider = ?config.kind,
                    model = %provider.model(),
                    "Initialized text provider"
                );
                ModelHandle::Ready(provider)
            }
            Err(e) => {
                tracing::error!(
                    provider = ?config.kind,
                    error = %e,
                    "Failed to initialize text provider; /analyze will return errors"
                );
                ModelHandle::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelHandle::Ready(_))
    }
}

fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn TextProvider>, ProviderError> {
    match config.kind {
        ProviderKind::Gemini => {
            let api_key = config.gemini.api_key.clone().ok_or_else(|| {
                ProviderError::NotConfigured("GEMINI_API_KEY is not set".to_string())
            })?;

            Ok(Arc::new(GeminiTextProvider::new(GeminiConfig {
                api_key,
                model: config.model.clone(),
                api_base: config.gemini.api_base.clone(),
            })?))
        }
        ProviderKind::Vertex => {
            let vertex = &config.vertex;
            let credentials = match (&vertex.credentials_json, &vertex.credentials_path) {
                (Some(json), _) => ServiceAccountKey::from_json(json.expose_secret())?,
                (None, Some(path)) => ServiceAccountKey::from_file(path)?,
                (None, None) => {
                    return Err(ProviderError::NotConfigured(
                        "no service account credential configured".to_string(),
                    ))
                }
            };

            Ok(Arc::new(VertexTextProvider::new(VertexConfig {
                credentials,
                project_id: vertex.project_id.clone(),
                location: vertex.location.clone(),
                model: config.model.clone(),
                api_base: vertex.api_base.clone(),
            })?))
        }
        ProviderKind::Mock => {
            let canned = serde_json::to_string(&ConceptReport::not_applicable())
                .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;
            Ok(Arc::new(MockTextProvider::replying(canned)))
        }
    }
}

/// What the model's text turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Structured(Map<String, Value>),
    Raw(String),
}

impl ModelOutput {
    /// Best-effort parse: a JSON object (optionally inside a markdown fence)
    /// is structured, anything else is raw text.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();

        match serde_json::from_str::<Value>(strip_code_fence(trimmed)) {
            Ok(Value::Object(map)) => ModelOutput::Structured(map),
            _ => ModelOutput::Raw(trimmed.to_string()),
        }
    }
}

impl From<ModelOutput> for ServiceResponse {
    fn from(output: ModelOutput) -> Self {
        match output {
            ModelOutput::Structured(map) => ServiceResponse::Report(map),
            ModelOutput::Raw(raw) => ServiceResponse::Raw { raw },
        }
    }
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = body.strip_suffix("```") else {
        return text;
    };

    // Drop the info string (e.g. `json`) unless the payload starts right after the fence.
    let body = body.trim_start();
    let info_len = if body.starts_with(|c: char| c == '{' || c == '[') {
        0
    } else {
        body.find(char::is_whitespace).unwrap_or(body.len())
    };

    body[info_len..].trim()
}

/// Turns code into a concept report via the configured provider.
#[derive(Clone)]
pub struct ConceptAnalyzer {
    handle: ModelHandle,
}

impl ConceptAnalyzer {
    pub fn new(handle: ModelHandle) -> Self {
        Self { handle }
    }

    pub fn is_ready(&self) -> bool {
        self.handle.is_ready()
    }

    /// Analyze one snippet. Never fails: provider errors become
    /// [`ServiceResponse::Error`].
    pub async fn analyze(&self, code: &str) -> ServiceResponse {
        let response = match &self.handle {
            ModelHandle::Unavailable { reason } => {
                tracing::warn!(%reason, "Analysis requested while model is unavailable");
                ServiceResponse::error(MODEL_NOT_INITIALIZED)
            }
            ModelHandle::Ready(provider) => {
                let prompt = build_prompt(code);

                match provider.generate_content(&prompt).await {
                    Ok(text) => {
                        tracing::debug!(model = %provider.model(), raw_text = %text, "Model response");
                        ModelOutput::from_text(&text).into()
                    }
                    Err(e) => {
                        tracing::error!(model = %provider.model(), error = %e, "Model call failed");
                        ServiceResponse::error(e.to_string())
                    }
                }
            }
        };

        metrics::counter!("concept_analysis_total", "outcome" => response.outcome()).increment(1);

        response
    }
}
