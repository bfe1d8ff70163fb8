use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{FoodCategory, InventoryItem, StorageType};
use crate::risk::ExpirationRisk;

/// `?user_id=` carried by most endpoints. Accepted but not used for isolation.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct RisksResponse {
    pub success: bool,
    pub count: usize,
    pub risks: Vec<ExpirationRisk>,
}

#[derive(Debug, Serialize)]
pub struct ItemRiskResponse {
    pub success: bool,
    pub risk: ExpirationRisk,
}

#[derive(Debug, Serialize)]
pub struct PriorityListResponse {
    pub success: bool,
    pub count: usize,
    pub priority_list: Vec<ExpirationRisk>,
}

#[derive(Debug, Deserialize)]
pub struct NewItemRequest {
    pub id: Option<String>,
    pub name: String,
    pub category: FoodCategory,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_added: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    pub storage_type: StorageType,
}

impl NewItemRequest {
    /// Missing id gets a fresh uuid; missing `date_added` means `now`.
    pub fn into_item(self, now: OffsetDateTime) -> InventoryItem {
        InventoryItem {
            id: self
                .id
                .unwrap_or_else(|| format!("inv_{}", uuid::Uuid::new_v4().simple())),
            name: self.name.trim().to_string(),
            category: self.category,
            quantity: self.quantity,
            unit: self.unit,
            date_added: self.date_added.unwrap_or(now),
            expiration_date: self.expiration_date,
            storage_type: self.storage_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddItemResponse {
    pub success: bool,
    pub item: InventoryItem,
    pub risk: ExpirationRisk,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub success: bool,
    pub message: String,
    pub items: Vec<InventoryItem>,
    pub risks: Vec<ExpirationRisk>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub success: bool,
    pub count: usize,
    pub items: Vec<InventoryItem>,
}

#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    pub user_id: String,
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ExpiringResponse {
    pub success: bool,
    pub days: i64,
    pub count: usize,
    pub items: Vec<InventoryItem>,
}

/// Partial edit. Fields left out of the body keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub category: Option<FoodCategory>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    pub storage_type: Option<StorageType>,
}

impl UpdateItemRequest {
    pub fn apply(self, item: &mut InventoryItem) {
        if let Some(name) = self.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            item.unit = unit;
        }
        if let Some(expiration_date) = self.expiration_date {
            item.expiration_date = Some(expiration_date);
        }
        if let Some(storage_type) = self.storage_type {
            item.storage_type = storage_type;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateItemResponse {
    pub success: bool,
    pub message: String,
    pub item: InventoryItem,
    pub risk: ExpirationRisk,
}

#[derive(Debug, Serialize)]
pub struct DeleteItemResponse {
    pub success: bool,
    pub message: String,
}
