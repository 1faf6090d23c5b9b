//! Prediction handler

use axum::{extract::{rejection::JsonRejection, State}, Json};
use uuid::Uuid;

use crate::{AppState, AppResult, AppError};
use crate::models::{PredictRequest, PredictResponse};

/// Classify a URL
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = payload.map_err(|e| {
        tracing::debug!("Rejected predict body: {}", e);
        AppError::UrlMissing
    })?;
    let url = req.url.ok_or(AppError::UrlMissing)?;

    let request_id = Uuid::new_v4();
    tracing::debug!(%request_id, "predict request ({} chars)", url.len());

    let result = state.pipeline.run(&url).await?;

    tracing::info!(
        %request_id,
        prediction = result.verdict.as_str(),
        confidence = result.confidence,
        "predict done"
    );

    Ok(Json(result.into()))
}
