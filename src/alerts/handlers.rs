use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{AlertsResponse, DismissResponse};
use crate::{
    error::{AppError, AppResult},
    inventory::dto::UserQuery,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/api/alerts/expiration", get(list_alerts))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/api/alerts/dismiss/:alert_id", post(dismiss_alert))
}

/// Unread alerts only, oldest first.
#[instrument(skip(state))]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> AppResult<Json<AlertsResponse>> {
    let alerts = state.consumption.unread_alerts().await?;
    Ok(Json(AlertsResponse {
        success: true,
        count: alerts.len(),
        alerts,
    }))
}

#[instrument(skip(state))]
pub async fn dismiss_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<String>,
) -> AppResult<Json<DismissResponse>> {
    if !state.consumption.dismiss_alert(&alert_id).await? {
        warn!(%alert_id, "dismiss for unknown alert");
        return Err(AppError::NotFound("Alert not found".into()));
    }
    Ok(Json(DismissResponse {
        success: true,
        message: "Alert dismissed".into(),
    }))
}
