use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, error, instrument};

use super::dto::{
    ConsumptionLogRequest, ConsumptionLogResponse, HistoryQuery, HistoryResponse, SummaryResponse,
};
use super::services::ConsumptionError;
use crate::{error::AppResult, inventory::dto::UserQuery, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/api/consumption/history", get(history))
        .route("/api/consumption/summary", get(summary))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/api/consumption/log", post(log_consumption))
}

/// Domain rejections answer 200 with `success: false`; only store failures
/// turn into a 500.
#[instrument(skip(state, req), fields(item_id = %req.item_id, user_id = %req.user_id))]
pub async fn log_consumption(
    State(state): State<AppState>,
    Json(req): Json<ConsumptionLogRequest>,
) -> AppResult<Json<ConsumptionLogResponse>> {
    let result = state
        .consumption
        .log_consumption(&req.user_id, &req.item_id, req.quantity, &req.unit)
        .await;

    match result {
        Ok(outcome) => {
            debug!(
                log_id = %outcome.log.id,
                new_alerts = outcome.new_alerts.len(),
                "risks recalculated"
            );
            Ok(Json(outcome.into()))
        }
        Err(ConsumptionError::Store(e)) => {
            error!(error = %e, "consumption failed");
            Err(anyhow::anyhow!("Error logging consumption: {e}").into())
        }
        Err(rejected) => Ok(Json(ConsumptionLogResponse::rejected(rejected.to_string()))),
    }
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> AppResult<Json<HistoryResponse>> {
    let logs = state.consumption.consumption_history(q.limit).await?;
    debug!(user_id = %q.user_id, count = logs.len(), "consumption history read");
    Ok(Json(HistoryResponse {
        success: true,
        count: logs.len(),
        logs,
    }))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> AppResult<Json<SummaryResponse>> {
    let summary = state.consumption.consumption_summary().await?;
    debug!(user_id = %q.user_id, items = summary.len(), "consumption summary read");
    Ok(Json(SummaryResponse {
        success: true,
        count: summary.len(),
        summary,
    }))
}
