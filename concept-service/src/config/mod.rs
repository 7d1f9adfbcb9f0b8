use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

use crate::services::providers::gemini::GEMINI_API_BASE;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_LOCATION: &str = "us-central1";

#[derive(Debug, Clone)]
pub struct ConceptConfig {
    pub common: core_config::Config,
    pub provider: ProviderConfig,
    pub cors: CorsConfig,
    pub otlp_endpoint: Option<String>,
}

/// Which backend answers `/analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Gemini API with an API key.
    Gemini,
    /// Vertex AI with a service-account credential.
    Vertex,
    /// Canned replies, no network.
    Mock,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "vertex" | "vertexai" | "vertex-ai" => Ok(ProviderKind::Vertex),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown CONCEPT_PROVIDER '{}': expected gemini, vertex or mock",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub model: String,
    pub gemini: GeminiSettings,
    pub vertex: VertexSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Missing keys are not a startup error; the model is reported unavailable.
    pub api_key: Option<Secret<String>>,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct VertexSettings {
    /// Inline service-account JSON. Takes precedence over `credentials_path`.
    pub credentials_json: Option<Secret<String>>,
    pub credentials_path: Option<String>,
    pub project_id: Option<String>,
    pub location: String,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Exact origins, or `*` for any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl ConceptConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        if let Some(level) = optional_env("LOG_LEVEL") {
            common.log_level = level;
        }

        let kind = optional_env("CONCEPT_PROVIDER")
            .map(|v| v.parse::<ProviderKind>())
            .transpose()?
            .unwrap_or(ProviderKind::Gemini);

        Ok(ConceptConfig {
            common,
            provider: ProviderConfig {
                kind,
                model: get_env("GEMINI_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                gemini: GeminiSettings {
                    api_key: optional_env("GEMINI_API_KEY").map(Secret::new),
                    api_base: env_or("GEMINI_API_BASE", GEMINI_API_BASE),
                },
                vertex: VertexSettings {
                    credentials_json: optional_env("GOOGLE_APPLICATION_CREDENTIALS_JSON")
                        .map(Secret::new),
                    credentials_path: optional_env("GOOGLE_APPLICATION_CREDENTIALS"),
                    project_id: optional_env("GOOGLE_CLOUD_PROJECT"),
                    location: get_env("GOOGLE_CLOUD_LOCATION", Some(DEFAULT_LOCATION), is_prod)?,
                    api_base: optional_env("VERTEX_API_BASE"),
                },
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some("*"),
                    is_prod,
                )?),
            },
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
        })
    }
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Like [`env_or`], but defaults are not accepted in production.
fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match optional_env(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
