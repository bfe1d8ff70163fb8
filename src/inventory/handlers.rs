use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::dto::{
    AddItemResponse, DeleteItemResponse, ExpiringQuery, ExpiringResponse, ItemRiskResponse,
    ItemsResponse, NewItemRequest, PriorityListResponse, RisksResponse, SeedResponse,
    UpdateItemRequest, UpdateItemResponse, UserQuery,
};
use super::services::{validate_new_item, ItemUpdateError, DEFAULT_EXPIRING_DAYS};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/api/inventory/risks", get(list_risks))
        .route("/api/inventory/risks/:item_id", get(get_item_risk))
        .route("/api/inventory/priority-list", get(priority_list))
        .route("/api/inventory/expiring", get(expiring_items))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/api/inventory/items", get(list_items).post(add_item))
        .route(
            "/api/inventory/items/:item_id",
            put(update_item).delete(delete_item),
        )
        .route("/api/test/add-inventory", post(seed_test_inventory))
}

#[instrument(skip(state))]
pub async fn list_risks(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> AppResult<Json<RisksResponse>> {
    let risks = state.consumption.inventory_risks().await?;
    Ok(Json(RisksResponse {
        success: true,
        count: risks.len(),
        risks,
    }))
}

#[instrument(skip(state))]
pub async fn get_item_risk(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(q): Query<UserQuery>,
) -> AppResult<Json<ItemRiskResponse>> {
    match state.consumption.item_risk(&item_id).await? {
        Some(risk) => Ok(Json(ItemRiskResponse {
            success: true,
            risk,
        })),
        None => {
            warn!(%item_id, "risk requested for unknown item");
            Err(AppError::NotFound("Item not found".into()))
        }
    }
}

#[instrument(skip(state))]
pub async fn priority_list(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> AppResult<Json<PriorityListResponse>> {
    let priority_list = state.consumption.priority_list().await?;
    Ok(Json(PriorityListResponse {
        success: true,
        count: priority_list.len(),
        priority_list,
    }))
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> AppResult<Json<ItemsResponse>> {
    let items = state.consumption.list_items().await?;
    Ok(Json(ItemsResponse {
        success: true,
        count: items.len(),
        items,
    }))
}

#[instrument(skip(state))]
pub async fn expiring_items(
    State(state): State<AppState>,
    Query(q): Query<ExpiringQuery>,
) -> AppResult<Json<ExpiringResponse>> {
    let days = q.days.unwrap_or(DEFAULT_EXPIRING_DAYS);
    let items = state.consumption.expiring_items(days).await?;
    Ok(Json(ExpiringResponse {
        success: true,
        days,
        count: items.len(),
        items,
    }))
}

#[instrument(skip(state, body))]
pub async fn add_item(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
    Json(body): Json<NewItemRequest>,
) -> AppResult<Json<AddItemResponse>> {
    let item = body.into_item(OffsetDateTime::now_utc());
    if let Err(reason) = validate_new_item(&item) {
        warn!(item_id = %item.id, %reason, "rejected inventory item");
        return Err(AppError::BadRequest(reason));
    }

    let risk = state.consumption.add_item(item.clone()).await?;
    Ok(Json(AddItemResponse {
        success: true,
        item,
        risk,
    }))
}

#[instrument(skip(state, body))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(q): Query<UserQuery>,
    Json(body): Json<UpdateItemRequest>,
) -> AppResult<Json<UpdateItemResponse>> {
    match state
        .consumption
        .update_item(&item_id, |item| body.apply(item))
        .await
    {
        Ok((item, risk)) => Ok(Json(UpdateItemResponse {
            success: true,
            message: "Item updated".into(),
            item,
            risk,
        })),
        Err(ItemUpdateError::NotFound) => {
            warn!(%item_id, "update for unknown item");
            Err(AppError::NotFound("Item not found".into()))
        }
        Err(ItemUpdateError::Invalid(reason)) => {
            warn!(%item_id, %reason, "rejected item update");
            Err(AppError::BadRequest(reason))
        }
        Err(ItemUpdateError::Store(e)) => Err(e.into()),
    }
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(q): Query<UserQuery>,
) -> AppResult<Json<DeleteItemResponse>> {
    if !state.consumption.delete_item(&item_id).await? {
        warn!(%item_id, "delete for unknown item");
        return Err(AppError::NotFound("Item not found".into()));
    }
    Ok(Json(DeleteItemResponse {
        success: true,
        message: "Item deleted".into(),
    }))
}

/// Loads the six demo items, replacing any earlier copies.
#[instrument(skip(state))]
pub async fn seed_test_inventory(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> AppResult<Json<SeedResponse>> {
    let (items, risks) = state.consumption.seed_demo_inventory().await?;
    info!(user_id = %q.user_id, count = items.len(), "test inventory added");
    Ok(Json(SeedResponse {
        success: true,
        message: format!("Added {} test inventory items", items.len()),
        items,
        risks,
    }))
}
