//! Vertex AI provider (service-account authentication).
//!
//! Each call mints a short-lived OAuth2 access token from the service-account
//! key (JWT bearer grant) and then calls the publisher model endpoint of the
//! configured project and region. Nothing is cached between calls.

use super::gemini::{http_client, read_generate_response, GenerateContentRequest};
use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::path::Path;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a Google service-account key file this provider needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: Secret<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(json).map_err(|e| {
            ProviderError::NotConfigured(format!("Invalid service account credential: {}", e))
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::NotConfigured(format!(
                "Cannot read service account credential {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}

/// Vertex AI provider configuration.
#[derive(Debug, Clone)]
pub struct VertexConfig {
    pub credentials: ServiceAccountKey,
    /// Overrides the key's own `project_id` when set.
    pub project_id: Option<String>,
    pub location: String,
    pub model: String,
    /// Defaults to the regional `https://{location}-aiplatform.googleapis.com/v1`.
    pub api_base: Option<String>,
}

/// Vertex AI text provider.
pub struct VertexTextProvider {
    client_email: String,
    token_uri: String,
    signing_key: EncodingKey,
    model: String,
    endpoint: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl VertexTextProvider {
    pub fn new(config: VertexConfig) -> Result<Self, ProviderError> {
        let project_id = config
            .project_id
            .clone()
            .or_else(|| config.credentials.project_id.clone())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                ProviderError::NotConfigured("Vertex AI project id not configured".to_string())
            })?;

        let signing_key =
            EncodingKey::from_rsa_pem(config.credentials.private_key.expose_secret().as_bytes())
                .map_err(|e| {
                    ProviderError::NotConfigured(format!("Invalid service account key: {}", e))
                })?;

        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com/v1", config.location));

        let endpoint = format!(
            "{}/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            api_base.trim_end_matches('/'),
            project_id,
            config.location,
            config.model
        );

        Ok(Self {
            client_email: config.credentials.client_email,
            token_uri: config.credentials.token_uri,
            signing_key,
            model: config.model,
            endpoint,
            client: http_client()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn signed_assertion(&self) -> Result<String, ProviderError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| ProviderError::Authentication(format!("Failed to sign assertion: {}", e)))
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let assertion = self.signed_assertion()?;

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Authentication(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            ProviderError::Authentication(format!("Failed to parse token response: {}", e))
        })?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl TextProvider for VertexTextProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, ProviderError> {
        let access_token = self.access_token().await?;

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending request to Vertex AI"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&access_token)
            .json(&GenerateContentRequest::user_prompt(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        read_generate_response(response, "Vertex AI").await
    }
}
