use serde::Serialize;
use time::OffsetDateTime;

use crate::risk::RiskLevel;

/// Stored notification for a high-risk item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpirationAlert {
    /// `alert_<n>`
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    pub alert_type: RiskLevel,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub is_read: bool,
    pub suggested_action: String,
    pub related_recipes: Option<Vec<String>>,
}
