use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use service_core::error::AppError;

use crate::dtos::{AnalysisRequest, ServiceResponse};
use crate::startup::AppState;

/// `POST /analyze`.
///
/// Body rejections (missing `code`, bad JSON) are answered by [`AppError`]
/// before the model is touched. Everything past that point is a 200 whose body
/// says whether the result is a report, raw text, or an error.
#[tracing::instrument(skip_all)]
pub async fn analyze(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<AnalysisRequest>, AppError>,
) -> Json<ServiceResponse> {
    tracing::info!(code_len = request.code.len(), "Analyzing code snippet");

    let response = state.analyzer.analyze(&request.code).await;

    tracing::info!(outcome = response.outcome(), "Analysis finished");

    Json(response)
}
