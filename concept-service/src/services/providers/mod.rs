//! Generative model providers.
//!
//! Every provider exposes the same capability, turning a prompt into model
//! text, so the prompt template and response normalization live in one place
//! no matter which backend answers.

pub mod gemini;
pub mod mock;
pub mod vertex;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiTextProvider};
pub use mock::MockTextProvider;
pub use vertex::{ServiceAccountKey, VertexConfig, VertexTextProvider};

/// Error type for provider operations.
///
/// The `Display` text is what callers of `/analyze` see in the `error` field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Text generation backend.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Model identifier every request is sent to.
    fn model(&self) -> &str;

    /// Send one prompt and return the model's text completion.
    async fn generate_content(&self, prompt: &str) -> Result<String, ProviderError>;
}
