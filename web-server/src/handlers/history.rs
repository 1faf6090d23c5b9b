//! Result log handler

use axum::{extract::{Query, State}, Json};

use crate::{AppState, AppResult};
use crate::models::{HistoryFilter, HistoryResponse};

/// Most recent classifications, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<HistoryFilter>,
) -> AppResult<Json<HistoryResponse>> {
    let limit = filter.effective_limit();
    let history = state.history.clone();

    let (total, entries) = tokio::task::spawn_blocking(move || {
        Ok::<_, urlguard_core::logic::telemetry::RecorderError>((history.count()?, history.recent(limit)?))
    })
    .await??;

    Ok(Json(HistoryResponse { total, entries }))
}
