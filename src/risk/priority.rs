use std::collections::HashMap;

use time::OffsetDateTime;

use super::calculator::calculate_expiration_risk;
use super::dto::ExpirationRisk;
use crate::inventory::repo_types::InventoryItem;

const WEIGHT_RISK: f64 = 0.6;
const WEIGHT_FIFO: f64 = 0.4;

/// Older stock scores higher: two points per day on the shelf, capped at 100.
pub fn fifo_score(date_added: OffsetDateTime, now: OffsetDateTime) -> f64 {
    let days_old = (now - date_added).whole_days().max(0);
    (days_old as f64 * 2.0).min(100.0)
}

pub fn consumption_priority(risk_score: f64, fifo_score: f64) -> f64 {
    risk_score * WEIGHT_RISK + fifo_score * WEIGHT_FIFO
}

/// Sorts highest priority first. The sort is stable, so equal priorities keep
/// the order the items were given in.
pub fn rank_by_priority(risks: &mut [ExpirationRisk]) {
    risks.sort_by(|a, b| b.consumption_priority.total_cmp(&a.consumption_priority));
}

/// Assesses every item and returns the ranked list.
///
/// `days_since_consumed` holds entries only for items with a known last
/// consumption; everything else falls back to `default_days`.
pub fn calculate_all_risks(
    items: &[InventoryItem],
    days_since_consumed: &HashMap<String, i64>,
    default_days: i64,
    now: OffsetDateTime,
) -> Vec<ExpirationRisk> {
    let mut risks: Vec<ExpirationRisk> = items
        .iter()
        .map(|item| {
            let days = days_since_consumed
                .get(&item.id)
                .copied()
                .unwrap_or(default_days);
            calculate_expiration_risk(item, days, now)
        })
        .collect();
    rank_by_priority(&mut risks);
    risks
}
