use serde::{Deserialize, Serialize};

use super::repo_types::{ConsumptionLog, ExpiredConsumptionAlert};
use super::services::{ConsumptionOutcome, ConsumptionSummary};
use crate::inventory::repo_types::InventoryItem;
use crate::risk::ExpirationRisk;

#[derive(Debug, Deserialize)]
pub struct ConsumptionLogRequest {
    pub item_id: String,
    pub quantity: f64,
    pub unit: String,
    pub user_id: String,
}

/// Both successful and rejected consumptions come back in this shape; the
/// optional lists are null on rejection.
#[derive(Debug, Serialize)]
pub struct ConsumptionLogResponse {
    pub success: bool,
    pub expired_alert: Option<ExpiredConsumptionAlert>,
    pub consumption_logged: bool,
    pub updated_inventory: Option<Vec<InventoryItem>>,
    pub risk_assessments: Option<Vec<ExpirationRisk>>,
    pub priority_list: Option<Vec<ExpirationRisk>>,
    pub message: String,
}

impl ConsumptionLogResponse {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            expired_alert: None,
            consumption_logged: false,
            updated_inventory: None,
            risk_assessments: None,
            priority_list: None,
            message: message.into(),
        }
    }
}

impl From<ConsumptionOutcome> for ConsumptionLogResponse {
    fn from(o: ConsumptionOutcome) -> Self {
        let message = o.message().to_string();
        Self {
            success: true,
            expired_alert: o.expired_alert,
            consumption_logged: true,
            updated_inventory: Some(o.updated_inventory),
            risk_assessments: Some(o.risk_assessments),
            priority_list: Some(o.priority_list),
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user_id: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub count: usize,
    pub logs: Vec<ConsumptionLog>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub count: usize,
    pub summary: Vec<ConsumptionSummary>,
}
