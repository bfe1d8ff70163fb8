use time::{Duration, OffsetDateTime};

use super::repo_types::{FoodCategory, InventoryItem, StorageType};
use crate::risk::calculator::days_until_expiry;

pub const DEFAULT_EXPIRING_DAYS: i64 = 3;

/// Why an edit to a stored item was refused.
#[derive(Debug, thiserror::Error)]
pub enum ItemUpdateError {
    #[error("Item not found")]
    NotFound,
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

struct DemoItem {
    id: &'static str,
    name: &'static str,
    category: FoodCategory,
    quantity: f64,
    unit: &'static str,
    added_days_ago: i64,
    expires_in_days: i64,
    storage_type: StorageType,
}

const DEMO_ITEMS: [DemoItem; 6] = [
    DemoItem {
        id: "inv_001",
        name: "Milk",
        category: FoodCategory::Dairy,
        quantity: 1.5,
        unit: "liters",
        added_days_ago: 5,
        expires_in_days: -1,
        storage_type: StorageType::Refrigerator,
    },
    DemoItem {
        id: "inv_002",
        name: "Broccoli",
        category: FoodCategory::Vegetables,
        quantity: 2.0,
        unit: "kg",
        added_days_ago: 2,
        expires_in_days: 3,
        storage_type: StorageType::Refrigerator,
    },
    DemoItem {
        id: "inv_003",
        name: "Salmon",
        category: FoodCategory::Seafood,
        quantity: 0.5,
        unit: "kg",
        added_days_ago: 1,
        expires_in_days: 1,
        storage_type: StorageType::Refrigerator,
    },
    DemoItem {
        id: "inv_004",
        name: "Canned Beans",
        category: FoodCategory::Canned,
        quantity: 3.0,
        unit: "cans",
        added_days_ago: 100,
        expires_in_days: 200,
        storage_type: StorageType::Pantry,
    },
    DemoItem {
        id: "inv_005",
        name: "Frozen Pizza",
        category: FoodCategory::Frozen,
        quantity: 2.0,
        unit: "pieces",
        added_days_ago: 50,
        expires_in_days: 100,
        storage_type: StorageType::Freezer,
    },
    DemoItem {
        id: "inv_006",
        name: "Apples",
        category: FoodCategory::Fruits,
        quantity: 1.5,
        unit: "kg",
        added_days_ago: 10,
        expires_in_days: 5,
        storage_type: StorageType::Pantry,
    },
];

/// Sample pantry, dated relative to `now`. Milk is already expired.
pub fn demo_inventory(now: OffsetDateTime) -> Vec<InventoryItem> {
    DEMO_ITEMS
        .iter()
        .map(|d| InventoryItem {
            id: d.id.to_string(),
            name: d.name.to_string(),
            category: d.category,
            quantity: d.quantity,
            unit: d.unit.to_string(),
            date_added: now - Duration::days(d.added_days_ago),
            expiration_date: Some(now + Duration::days(d.expires_in_days)),
            storage_type: d.storage_type,
        })
        .collect()
}

/// Dated items at most `days` whole days from expiry, soonest first. Expired
/// items count as zero days out; undated items never qualify.
pub fn expiring_within(
    items: Vec<InventoryItem>,
    days: i64,
    now: OffsetDateTime,
) -> Vec<InventoryItem> {
    let mut soon: Vec<InventoryItem> = items
        .into_iter()
        .filter(|i| i.expiration_date.is_some())
        .filter(|i| days_until_expiry(i.expiration_date, now) <= days)
        .collect();
    soon.sort_by_key(|i| i.expiration_date);
    soon
}

/// Validation for client-supplied items. Returns the reason on rejection.
pub fn validate_new_item(item: &InventoryItem) -> Result<(), String> {
    if item.id.trim().is_empty() {
        return Err("Item id must not be empty".into());
    }
    if item.name.trim().is_empty() {
        return Err("Item name must not be empty".into());
    }
    if !item.quantity.is_finite() || item.quantity < 0.0 {
        return Err("Quantity must be a non-negative number".into());
    }
    Ok(())
}
