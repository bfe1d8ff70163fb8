use serde::Serialize;
use time::OffsetDateTime;

use crate::inventory::repo_types::FoodCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            RiskLevel::Critical
        } else if score >= 60.0 {
            RiskLevel::High
        } else if score >= 40.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// High and critical items raise alerts.
    pub fn is_alerting(self) -> bool {
        self >= RiskLevel::High
    }
}

/// Sub-scores feeding the weighted formula, each on a 0-100 scale
/// (the seasonal one may reach 150 before weighting).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskFactors {
    pub base_shelf_life: f64,
    pub category_modifier: f64,
    pub seasonal_modifier: f64,
    pub consumption_frequency: f64,
    pub storage_condition: f64,
}

/// Risk assessment for one inventory item. Always derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpirationRisk {
    pub item_id: String,
    pub item_name: String,
    pub category: FoodCategory,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub days_until_expiry: i64,
    pub consumption_priority: f64,
    pub factors: RiskFactors,
    pub recommended_action: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds() {
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(80.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(79.99), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(60.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(59.99), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(39.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
    }

    #[test]
    fn only_high_and_critical_alert() {
        assert!(RiskLevel::Critical.is_alerting());
        assert!(RiskLevel::High.is_alerting());
        assert!(!RiskLevel::Medium.is_alerting());
        assert!(!RiskLevel::Low.is_alerting());
        assert_eq!(serde_json::to_value(RiskLevel::High).unwrap(), "high");
    }
}
