//! Static scoring tables. Every lookup is an exhaustive match so adding a
//! category or storage type fails to compile until its scores are filled in.

use serde::Serialize;
use time::{Month, OffsetDateTime};

use crate::inventory::repo_types::{FoodCategory, StorageType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn from_month(month: Month) -> Self {
        use Month::*;
        match month {
            December | January | February => Season::Winter,
            March | April | May => Season::Spring,
            June | July | August => Season::Summer,
            September | October | November => Season::Fall,
        }
    }

    pub fn at(now: OffsetDateTime) -> Self {
        Self::from_month(now.month())
    }
}

/// Inherent perishability, 0-100.
pub fn category_score(category: FoodCategory) -> f64 {
    match category {
        FoodCategory::Dairy => 85.0,
        FoodCategory::Meat => 90.0,
        FoodCategory::Seafood => 95.0,
        FoodCategory::Fruits => 70.0,
        FoodCategory::Vegetables => 65.0,
        FoodCategory::Bakery => 60.0,
        FoodCategory::Canned => 15.0,
        FoodCategory::Frozen => 20.0,
        FoodCategory::Condiments => 25.0,
        FoodCategory::Grains => 20.0,
    }
}

/// Multiplier applied to fresh categories; shelf-stable ones stay at 1.0.
pub fn seasonal_multiplier(season: Season, category: FoodCategory) -> f64 {
    use FoodCategory::*;
    match (season, category) {
        (Season::Summer, Fruits | Vegetables) => 1.3,
        (Season::Summer, Dairy) => 1.2,
        (Season::Summer, Meat) => 1.4,
        (Season::Summer, Seafood) => 1.5,

        (Season::Winter, Fruits | Vegetables) => 0.9,
        (Season::Winter, Dairy | Meat) => 1.0,
        (Season::Winter, Seafood) => 1.1,

        (Season::Spring, Fruits | Vegetables | Dairy | Meat) => 1.1,
        (Season::Spring, Seafood) => 1.2,

        (Season::Fall, _) => 1.0,
        (_, Bakery | Canned | Frozen | Condiments | Grains) => 1.0,
    }
}

/// Days an item of this category may go unconsumed before it counts as neglected.
pub fn consumption_threshold_days(category: FoodCategory) -> i64 {
    match category {
        FoodCategory::Dairy => 7,
        FoodCategory::Meat => 10,
        FoodCategory::Seafood => 7,
        FoodCategory::Fruits => 14,
        FoodCategory::Vegetables => 14,
        FoodCategory::Bakery => 5,
        FoodCategory::Canned => 30,
        FoodCategory::Frozen => 60,
        FoodCategory::Condiments => 60,
        FoodCategory::Grains => 60,
    }
}

pub fn storage_score(storage: StorageType) -> f64 {
    match storage {
        StorageType::Pantry => 70.0,
        StorageType::Refrigerator => 85.0,
        StorageType::Freezer => 95.0,
    }
}
