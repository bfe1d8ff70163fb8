use serde::Serialize;
use time::OffsetDateTime;

/// Append-only record of one consumption event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionLog {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    pub item_name: String,
    pub quantity_consumed: f64,
    pub unit: String,
    #[serde(with = "time::serde::rfc3339")]
    pub consumed_at: OffsetDateTime,
    pub was_expired: bool,
}

/// Returned alongside a consumption of an already expired item. Not stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiredConsumptionAlert {
    pub item_id: String,
    pub item_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expiration_date: OffsetDateTime,
    pub days_expired: i64,
    pub message: String,
    pub health_warning: String,
}
