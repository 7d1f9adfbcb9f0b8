//! HTTP handlers for concept-service.

pub mod analyze;
pub mod health;
pub mod metrics;

pub use self::analyze::analyze;
pub use self::health::{health_check, root};
pub use self::metrics::metrics;

use axum::http::Uri;
use service_core::error::AppError;

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}
