use serde::Serialize;

use super::repo_types::ExpirationAlert;

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub success: bool,
    pub count: usize,
    pub alerts: Vec<ExpirationAlert>,
}

#[derive(Debug, Serialize)]
pub struct DismissResponse {
    pub success: bool,
    pub message: String,
}
