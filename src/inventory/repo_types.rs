use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Food categories, ordered roughly by how the UI groups them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Dairy,
    Meat,
    Seafood,
    Fruits,
    Vegetables,
    Bakery,
    Canned,
    Frozen,
    Condiments,
    Grains,
}

/// Where an item is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Refrigerator,
    Freezer,
    Pantry,
}

/// Inventory record held in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: FoodCategory,
    pub quantity: f64, // never negative
    pub unit: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_added: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    pub storage_type: StorageType,
}

impl InventoryItem {
    /// Depleted items stay in the store but drop out of every list view.
    pub fn is_active(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        matches!(self.expiration_date, Some(exp) if now > exp)
    }

    /// Whole days since expiration, 0 when not expired or undated.
    pub fn days_expired_at(&self, now: OffsetDateTime) -> i64 {
        self.expiration_date
            .map(|exp| (now - exp).whole_days().max(0))
            .unwrap_or(0)
    }
}
