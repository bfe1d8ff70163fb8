use time::OffsetDateTime;

use super::repo_types::ExpirationAlert;
use crate::risk::ExpirationRisk;

/// One alert per high or critical assessment. Ids continue from `next_index`
/// so they stay unique across calls; no deduplication against earlier alerts.
pub fn build_high_risk_alerts(
    risks: &[ExpirationRisk],
    next_index: usize,
    now: OffsetDateTime,
) -> Vec<ExpirationAlert> {
    risks
        .iter()
        .filter(|r| r.risk_level.is_alerting())
        .enumerate()
        .map(|(offset, r)| ExpirationAlert {
            id: format!("alert_{}", next_index + offset),
            item_id: r.item_id.clone(),
            item_name: r.item_name.clone(),
            alert_type: r.risk_level,
            message: format!("High priority: {}", r.recommended_action),
            created_at: now,
            is_read: false,
            suggested_action: r.recommended_action.clone(),
            related_recipes: None,
        })
        .collect()
}
