use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /analyze`. `code` is required but otherwise unchecked.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub code: String,
}

/// Body returned by `POST /analyze`. Exactly one shape per response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServiceResponse {
    /// The model's JSON object, passed through unchanged.
    Report(Map<String, Value>),
    /// Model text that was not a JSON object.
    Raw { raw: String },
    /// Provider failure or unavailable model.
    Error { error: String },
}

impl ServiceResponse {
    pub fn error(message: impl Into<String>) -> Self {
        ServiceResponse::Error {
            error: message.into(),
        }
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ServiceResponse::Report(_) => "structured",
            ServiceResponse::Raw { .. } => "raw",
            ServiceResponse::Error { .. } => "error",
        }
    }
}
