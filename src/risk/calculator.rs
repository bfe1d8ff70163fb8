use time::OffsetDateTime;

use super::dto::{ExpirationRisk, RiskFactors, RiskLevel};
use super::priority::{consumption_priority, fifo_score};
use super::tables::{
    category_score, consumption_threshold_days, seasonal_multiplier, storage_score, Season,
};
use crate::inventory::repo_types::{FoodCategory, InventoryItem};

/// Reported for items without an expiration date.
pub const NO_EXPIRY_DAYS: i64 = 365;

const WEIGHT_SHELF_LIFE: f64 = 0.40;
const WEIGHT_CATEGORY: f64 = 0.25;
const WEIGHT_SEASONAL: f64 = 0.15;
const WEIGHT_FREQUENCY: f64 = 0.15;
const WEIGHT_STORAGE: f64 = 0.05;

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Whole days left before expiry, floored at 0.
pub fn days_until_expiry(expiration_date: Option<OffsetDateTime>, now: OffsetDateTime) -> i64 {
    match expiration_date {
        Some(exp) => (exp - now).whole_days().max(0),
        None => NO_EXPIRY_DAYS,
    }
}

/// Urgency sub-score from the expiry bucket.
pub fn shelf_life_score(expired: bool, days_to_expiry: i64) -> f64 {
    if expired {
        return 100.0;
    }
    match days_to_expiry {
        d if d <= 0 => 95.0,
        1 => 90.0,
        2..=3 => 80.0,
        4..=7 => 60.0,
        8..=14 => 40.0,
        15..=30 => 25.0,
        _ => 10.0,
    }
}

/// Items left untouched past their category threshold score higher.
pub fn consumption_frequency_score(days_since_consumed: i64, category: FoodCategory) -> f64 {
    let threshold = consumption_threshold_days(category);
    if days_since_consumed <= threshold {
        20.0
    } else if days_since_consumed <= threshold * 2 {
        50.0
    } else {
        80.0
    }
}

pub fn risk_factors(
    item: &InventoryItem,
    days_since_consumed: i64,
    now: OffsetDateTime,
) -> RiskFactors {
    let days = days_until_expiry(item.expiration_date, now);
    let season = Season::at(now);
    RiskFactors {
        base_shelf_life: shelf_life_score(item.is_expired_at(now), days),
        category_modifier: category_score(item.category),
        seasonal_modifier: seasonal_multiplier(season, item.category) * 100.0,
        consumption_frequency: consumption_frequency_score(days_since_consumed, item.category),
        storage_condition: storage_score(item.storage_type),
    }
}

/// Weighted sum of the factors, clamped to [0, 100].
pub fn risk_score(factors: &RiskFactors) -> f64 {
    let score = factors.base_shelf_life * WEIGHT_SHELF_LIFE
        + factors.category_modifier * WEIGHT_CATEGORY
        + factors.seasonal_modifier * WEIGHT_SEASONAL
        + factors.consumption_frequency * WEIGHT_FREQUENCY
        + factors.storage_condition * WEIGHT_STORAGE;
    score.clamp(0.0, 100.0)
}

pub fn recommended_action(item: &InventoryItem, level: RiskLevel, days_to_expiry: i64) -> String {
    match level {
        RiskLevel::Critical => format!(
            "Consume immediately! {} expires in {} days.",
            item.name, days_to_expiry
        ),
        RiskLevel::High => format!(
            "Use within {} days. Consider prioritizing this item.",
            days_to_expiry
        ),
        RiskLevel::Medium => format!(
            "Plan consumption within 1-2 weeks. {} is moderately urgent.",
            item.name
        ),
        RiskLevel::Low => format!("{} is in good condition. No immediate action needed.", item.name),
    }
}

/// Full assessment for one item as of `now`.
pub fn calculate_expiration_risk(
    item: &InventoryItem,
    days_since_consumed: i64,
    now: OffsetDateTime,
) -> ExpirationRisk {
    let days = days_until_expiry(item.expiration_date, now);
    let factors = risk_factors(item, days_since_consumed, now);
    let score = risk_score(&factors);
    let level = RiskLevel::from_score(score);
    let priority = consumption_priority(score, fifo_score(item.date_added, now));

    ExpirationRisk {
        item_id: item.id.clone(),
        item_name: item.name.clone(),
        category: item.category,
        risk_score: round2(score),
        risk_level: level,
        days_until_expiry: days,
        consumption_priority: round2(priority),
        factors,
        recommended_action: recommended_action(item, level, days),
        expiration_date: item.expiration_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::repo_types::StorageType;
    use time::macros::datetime;
    use time::Duration;

    const SUMMER: OffsetDateTime = datetime!(2025-07-15 12:00 UTC);
    const FALL: OffsetDateTime = datetime!(2025-10-15 12:00 UTC);

    fn item(
        category: FoodCategory,
        storage_type: StorageType,
        expires_in: Option<Duration>,
        now: OffsetDateTime,
    ) -> InventoryItem {
        InventoryItem {
            id: "inv_t".into(),
            name: "Test Item".into(),
            category,
            quantity: 1.0,
            unit: "kg".into(),
            date_added: now,
            expiration_date: expires_in.map(|d| now + d),
            storage_type,
        }
    }

    #[test]
    fn shelf_life_buckets() {
        assert_eq!(shelf_life_score(true, 0), 100.0);
        assert_eq!(shelf_life_score(false, 0), 95.0);
        assert_eq!(shelf_life_score(false, 1), 90.0);
        assert_eq!(shelf_life_score(false, 3), 80.0);
        assert_eq!(shelf_life_score(false, 7), 60.0);
        assert_eq!(shelf_life_score(false, 14), 40.0);
        assert_eq!(shelf_life_score(false, 30), 25.0);
        assert_eq!(shelf_life_score(false, 31), 10.0);
        assert_eq!(shelf_life_score(false, NO_EXPIRY_DAYS), 10.0);
    }

    #[test]
    fn frequency_buckets_scale_with_category() {
        assert_eq!(consumption_frequency_score(7, FoodCategory::Dairy), 20.0);
        assert_eq!(consumption_frequency_score(14, FoodCategory::Dairy), 50.0);
        assert_eq!(consumption_frequency_score(15, FoodCategory::Dairy), 80.0);
        assert_eq!(consumption_frequency_score(30, FoodCategory::Grains), 20.0);
        assert_eq!(consumption_frequency_score(0, FoodCategory::Bakery), 20.0);
    }

    #[test]
    fn days_until_expiry_is_floored() {
        let now = FALL;
        assert_eq!(days_until_expiry(Some(now - Duration::days(4)), now), 0);
        assert_eq!(days_until_expiry(Some(now + Duration::hours(36)), now), 1);
        assert_eq!(days_until_expiry(None, now), NO_EXPIRY_DAYS);
    }

    #[test]
    fn seafood_expiring_tomorrow_in_summer_is_critical() {
        let salmon = item(
            FoodCategory::Seafood,
            StorageType::Refrigerator,
            Some(Duration::days(1)),
            SUMMER,
        );
        let risk = calculate_expiration_risk(&salmon, 30, SUMMER);

        assert_eq!(risk.factors.base_shelf_life, 90.0);
        assert_eq!(risk.factors.category_modifier, 95.0);
        assert_eq!(risk.factors.seasonal_modifier, 150.0);
        assert_eq!(risk.factors.consumption_frequency, 80.0);
        assert_eq!(risk.factors.storage_condition, 85.0);
        // 36 + 23.75 + 22.5 + 12 + 4.25
        assert_eq!(risk.risk_score, 98.5);
        assert_eq!(risk.risk_level, RiskLevel::Critical);
        assert_eq!(risk.days_until_expiry, 1);
        assert_eq!(
            risk.recommended_action,
            "Consume immediately! Test Item expires in 1 days."
        );
    }

    #[test]
    fn long_lived_pantry_item_is_low() {
        let beans = item(
            FoodCategory::Canned,
            StorageType::Pantry,
            Some(Duration::days(200)),
            FALL,
        );
        let risk = calculate_expiration_risk(&beans, 0, FALL);
        // 4 + 3.75 + 15 + 3 + 3.5
        assert_eq!(risk.risk_score, 29.25);
        assert_eq!(risk.risk_level, RiskLevel::Low);
        assert_eq!(
            risk.recommended_action,
            "Test Item is in good condition. No immediate action needed."
        );
    }

    #[test]
    fn expired_item_gets_full_urgency_and_zero_days() {
        let milk = item(
            FoodCategory::Dairy,
            StorageType::Refrigerator,
            Some(Duration::days(-1)),
            FALL,
        );
        let risk = calculate_expiration_risk(&milk, 30, FALL);
        assert_eq!(risk.factors.base_shelf_life, 100.0);
        assert_eq!(risk.days_until_expiry, 0);
        // 40 + 21.25 + 15 + 12 + 4.25
        assert_eq!(risk.risk_score, 92.5);
        assert_eq!(risk.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn score_is_clamped() {
        let factors = RiskFactors {
            base_shelf_life: 100.0,
            category_modifier: 100.0,
            seasonal_modifier: 150.0,
            consumption_frequency: 100.0,
            storage_condition: 100.0,
        };
        assert_eq!(risk_score(&factors), 100.0);
    }

    #[test]
    fn score_and_level_stay_consistent_across_inputs() {
        let categories = [
            FoodCategory::Dairy,
            FoodCategory::Meat,
            FoodCategory::Seafood,
            FoodCategory::Fruits,
            FoodCategory::Vegetables,
            FoodCategory::Bakery,
            FoodCategory::Canned,
            FoodCategory::Frozen,
            FoodCategory::Condiments,
            FoodCategory::Grains,
        ];
        let storages = [StorageType::Pantry, StorageType::Refrigerator, StorageType::Freezer];
        let offsets = [None, Some(-10), Some(0), Some(2), Some(10), Some(90)];

        for now in [SUMMER, FALL, datetime!(2025-01-15 12:00 UTC)] {
            for category in categories {
                for storage in storages {
                    for offset in offsets {
                        let it = item(category, storage, offset.map(Duration::days), now);
                        let risk = calculate_expiration_risk(&it, 45, now);
                        assert!((0.0..=100.0).contains(&risk.risk_score));
                        assert_eq!(risk.risk_level, RiskLevel::from_score(risk.risk_score));
                        assert!(risk.days_until_expiry >= 0);
                        assert!(risk.consumption_priority > 0.0);
                        assert!(risk.consumption_priority <= 100.0);
                    }
                }
            }
        }
    }
}
