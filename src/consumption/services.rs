use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::repo_types::{ConsumptionLog, ExpiredConsumptionAlert};
use crate::alerts::repo_types::ExpirationAlert;
use crate::alerts::services::build_high_risk_alerts;
use crate::config::ScoringConfig;
use crate::inventory::repo_types::InventoryItem;
use crate::inventory::services::{
    demo_inventory, expiring_within, validate_new_item, ItemUpdateError,
};
use crate::risk::{calculate_all_risks, calculate_expiration_risk, ExpirationRisk};
use crate::store::InventoryStore;

const HEALTH_WARNING: &str = "Please check for signs of spoilage before consuming. \
     Consuming expired food may pose health risks.";

/// Reasons a consumption request is refused. Everything except `Store` is a
/// domain rejection and leaves the inventory untouched.
#[derive(Debug, thiserror::Error)]
pub enum ConsumptionError {
    #[error("Item not found in inventory")]
    ItemNotFound,
    #[error("Quantity must be a positive number")]
    InvalidQuantity,
    #[error("Insufficient quantity. Available: {available}")]
    InsufficientQuantity { available: f64 },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct ConsumptionOutcome {
    pub log: ConsumptionLog,
    pub expired_alert: Option<ExpiredConsumptionAlert>,
    pub updated_inventory: Vec<InventoryItem>,
    pub risk_assessments: Vec<ExpirationRisk>,
    pub priority_list: Vec<ExpirationRisk>,
    pub new_alerts: Vec<ExpirationAlert>,
}

impl ConsumptionOutcome {
    pub fn message(&self) -> &'static str {
        if self.expired_alert.is_some() {
            "Consumption logged (EXPIRED ITEM ALERT!)"
        } else {
            "Consumption logged successfully and risks recalculated"
        }
    }
}

/// Per-item roll-up of the consumption log.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConsumptionSummary {
    pub item_id: String,
    pub item_name: String,
    pub unit: String,
    pub times_consumed: usize,
    pub total_quantity: f64,
    pub expired_consumptions: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub last_consumed_at: OffsetDateTime,
}

pub fn expired_consumption_alert(
    item: &InventoryItem,
    expiration_date: OffsetDateTime,
    now: OffsetDateTime,
) -> ExpiredConsumptionAlert {
    let days_expired = item.days_expired_at(now);
    ExpiredConsumptionAlert {
        item_id: item.id.clone(),
        item_name: item.name.clone(),
        expiration_date,
        days_expired,
        message: format!("Warning: {} expired {} days ago.", item.name, days_expired),
        health_warning: HEALTH_WARNING.to_string(),
    }
}

/// Owns the inventory, the consumption log and the alert list, and keeps
/// risk assessments in step with them.
pub struct ConsumptionService {
    store: Arc<dyn InventoryStore>,
    scoring: ScoringConfig,
    // held across every multi-step mutation
    write_lock: Mutex<()>,
}

impl ConsumptionService {
    pub fn new(store: Arc<dyn InventoryStore>, scoring: ScoringConfig) -> Self {
        Self {
            store,
            scoring,
            write_lock: Mutex::new(()),
        }
    }

    /// Decrements stock, records the event, then reassesses every active item
    /// and raises alerts for the ones at high or critical risk.
    pub async fn log_consumption(
        &self,
        user_id: &str,
        item_id: &str,
        quantity: f64,
        unit: &str,
    ) -> Result<ConsumptionOutcome, ConsumptionError> {
        let _guard = self.write_lock.lock().await;
        let now = OffsetDateTime::now_utc();

        let Some(item) = self.store.get_item(item_id).await? else {
            warn!(%item_id, "consumption for unknown item");
            return Err(ConsumptionError::ItemNotFound);
        };
        if !quantity.is_finite() || quantity <= 0.0 {
            warn!(%item_id, quantity, "consumption with invalid quantity");
            return Err(ConsumptionError::InvalidQuantity);
        }
        if item.quantity < quantity {
            warn!(%item_id, available = item.quantity, requested = quantity, "insufficient quantity");
            return Err(ConsumptionError::InsufficientQuantity {
                available: item.quantity,
            });
        }

        let expired_alert = match item.expiration_date {
            Some(exp) if item.is_expired_at(now) => Some(expired_consumption_alert(&item, exp, now)),
            _ => None,
        };

        let remaining = (item.quantity - quantity).max(0.0);
        self.store
            .set_quantity(&item.id, remaining)
            .await?
            .with_context(|| format!("item {} disappeared while consuming", item.id))?;

        let log = ConsumptionLog {
            id: format!("log_{}", self.store.log_count().await?),
            user_id: user_id.to_string(),
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            quantity_consumed: quantity,
            unit: unit.to_string(),
            consumed_at: now,
            was_expired: expired_alert.is_some(),
        };
        self.store.append_log(log.clone()).await?;
        self.store.record_consumed(&item.id, now).await?;

        let (updated_inventory, risk_assessments) = self.active_risks(now).await?;

        let new_alerts =
            build_high_risk_alerts(&risk_assessments, self.store.alert_count().await?, now);
        if !new_alerts.is_empty() {
            debug!(count = new_alerts.len(), "raising high-risk alerts");
            self.store.append_alerts(new_alerts.clone()).await?;
        }

        let priority_list = self.top(&risk_assessments);
        info!(
            %user_id,
            item_id = %item.id,
            quantity,
            remaining,
            was_expired = log.was_expired,
            "consumption logged"
        );

        Ok(ConsumptionOutcome {
            log,
            expired_alert,
            updated_inventory,
            risk_assessments,
            priority_list,
            new_alerts,
        })
    }

    /// Ranked assessments for every item still in stock.
    pub async fn inventory_risks(&self) -> anyhow::Result<Vec<ExpirationRisk>> {
        let (_, risks) = self.active_risks(OffsetDateTime::now_utc()).await?;
        Ok(risks)
    }

    pub async fn priority_list(&self) -> anyhow::Result<Vec<ExpirationRisk>> {
        let risks = self.inventory_risks().await?;
        Ok(self.top(&risks))
    }

    /// Assessment for one item, depleted or not.
    pub async fn item_risk(&self, item_id: &str) -> anyhow::Result<Option<ExpirationRisk>> {
        let now = OffsetDateTime::now_utc();
        let Some(item) = self.store.get_item(item_id).await? else {
            return Ok(None);
        };
        let days = self.days_since_item_consumed(item_id, now).await?;
        Ok(Some(calculate_expiration_risk(&item, days, now)))
    }

    /// Items still in stock, in insertion order.
    pub async fn list_items(&self) -> anyhow::Result<Vec<InventoryItem>> {
        Ok(self
            .store
            .list_items()
            .await?
            .into_iter()
            .filter(InventoryItem::is_active)
            .collect())
    }

    pub async fn expiring_items(&self, days: i64) -> anyhow::Result<Vec<InventoryItem>> {
        let items = self.list_items().await?;
        Ok(expiring_within(items, days, OffsetDateTime::now_utc()))
    }

    /// Applies `edit` to a stored item and reassesses it. The id and the
    /// consumption recency survive the edit.
    pub async fn update_item<F>(
        &self,
        item_id: &str,
        edit: F,
    ) -> Result<(InventoryItem, ExpirationRisk), ItemUpdateError>
    where
        F: FnOnce(&mut InventoryItem) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let now = OffsetDateTime::now_utc();

        let mut item = self
            .store
            .get_item(item_id)
            .await?
            .ok_or(ItemUpdateError::NotFound)?;
        edit(&mut item);
        item.id = item_id.to_string();
        validate_new_item(&item).map_err(ItemUpdateError::Invalid)?;

        if !self.store.replace_item(item.clone()).await? {
            return Err(ItemUpdateError::NotFound);
        }
        let days = self.days_since_item_consumed(item_id, now).await?;
        info!(%item_id, quantity = item.quantity, "inventory item updated");
        let risk = calculate_expiration_risk(&item, days, now);
        Ok((item, risk))
    }

    /// Returns false when the item is unknown.
    pub async fn delete_item(&self, item_id: &str) -> anyhow::Result<bool> {
        let _guard = self.write_lock.lock().await;
        let removed = self.store.delete_item(item_id).await?;
        if removed {
            info!(%item_id, "inventory item deleted");
        }
        Ok(removed)
    }

    pub async fn unread_alerts(&self) -> anyhow::Result<Vec<ExpirationAlert>> {
        let alerts = self.store.list_alerts().await?;
        Ok(alerts.into_iter().filter(|a| !a.is_read).collect())
    }

    pub async fn dismiss_alert(&self, alert_id: &str) -> anyhow::Result<bool> {
        let _guard = self.write_lock.lock().await;
        let found = self.store.mark_alert_read(alert_id).await?;
        if found {
            info!(%alert_id, "alert dismissed");
        }
        Ok(found)
    }

    /// Inserts or replaces an item and returns its fresh assessment.
    pub async fn add_item(&self, item: InventoryItem) -> anyhow::Result<ExpirationRisk> {
        let _guard = self.write_lock.lock().await;
        let risk = calculate_expiration_risk(
            &item,
            self.scoring.default_days_since_consumed,
            OffsetDateTime::now_utc(),
        );
        info!(item_id = %item.id, category = ?item.category, "inventory item added");
        self.store.upsert_item(item).await?;
        Ok(risk)
    }

    pub async fn seed_demo_inventory(
        &self,
    ) -> anyhow::Result<(Vec<InventoryItem>, Vec<ExpirationRisk>)> {
        let items = {
            let _guard = self.write_lock.lock().await;
            let items = demo_inventory(OffsetDateTime::now_utc());
            for item in &items {
                self.store.upsert_item(item.clone()).await?;
            }
            items
        };
        info!(count = items.len(), "demo inventory seeded");
        let risks = self.inventory_risks().await?;
        Ok((items, risks))
    }

    /// Most recent first.
    pub async fn consumption_history(
        &self,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<ConsumptionLog>> {
        let mut logs = self.store.list_logs().await?;
        logs.reverse();
        if let Some(limit) = limit {
            logs.truncate(limit);
        }
        Ok(logs)
    }

    /// Totals per item, in order of first consumption.
    pub async fn consumption_summary(&self) -> anyhow::Result<Vec<ConsumptionSummary>> {
        let mut out: Vec<ConsumptionSummary> = Vec::new();
        for log in self.store.list_logs().await? {
            match out.iter().position(|s| s.item_id == log.item_id) {
                Some(idx) => {
                    let s = &mut out[idx];
                    s.times_consumed += 1;
                    s.total_quantity += log.quantity_consumed;
                    s.expired_consumptions += usize::from(log.was_expired);
                    s.last_consumed_at = log.consumed_at;
                    s.unit = log.unit;
                }
                None => out.push(ConsumptionSummary {
                    item_id: log.item_id,
                    item_name: log.item_name,
                    unit: log.unit,
                    times_consumed: 1,
                    total_quantity: log.quantity_consumed,
                    expired_consumptions: usize::from(log.was_expired),
                    last_consumed_at: log.consumed_at,
                }),
            }
        }
        Ok(out)
    }

    async fn days_since_consumed(
        &self,
        now: OffsetDateTime,
    ) -> anyhow::Result<HashMap<String, i64>> {
        Ok(self
            .store
            .last_consumed()
            .await?
            .into_iter()
            .map(|(id, at)| (id, (now - at).whole_days().max(0)))
            .collect())
    }

    async fn days_since_item_consumed(
        &self,
        item_id: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<i64> {
        Ok(self
            .days_since_consumed(now)
            .await?
            .get(item_id)
            .copied()
            .unwrap_or(self.scoring.default_days_since_consumed))
    }

    async fn active_risks(
        &self,
        now: OffsetDateTime,
    ) -> anyhow::Result<(Vec<InventoryItem>, Vec<ExpirationRisk>)> {
        let items = self.list_items().await?;
        let days = self.days_since_consumed(now).await?;
        let risks = calculate_all_risks(
            &items,
            &days,
            self.scoring.default_days_since_consumed,
            now,
        );
        Ok((items, risks))
    }

    fn top(&self, risks: &[ExpirationRisk]) -> Vec<ExpirationRisk> {
        risks
            .iter()
            .take(self.scoring.priority_list_limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::repo_types::{FoodCategory, StorageType};
    use crate::risk::RiskLevel;
    use crate::store::MemoryStore;
    use time::Duration;

    async fn seeded() -> ConsumptionService {
        let svc = ConsumptionService::new(Arc::new(MemoryStore::new()), ScoringConfig::default());
        svc.seed_demo_inventory().await.unwrap();
        svc
    }

    fn meat_item(id: &str, added_days_ago: i64, expires_in: i64) -> InventoryItem {
        let now = OffsetDateTime::now_utc();
        InventoryItem {
            id: id.into(),
            name: format!("Item {id}"),
            category: FoodCategory::Meat,
            quantity: 1.0,
            unit: "kg".into(),
            date_added: now - Duration::days(added_days_ago),
            expiration_date: Some(now + Duration::days(expires_in)),
            storage_type: StorageType::Refrigerator,
        }
    }

    #[tokio::test]
    async fn unknown_item_is_rejected() {
        let svc = seeded().await;
        let err = svc
            .log_consumption("user_1", "inv_404", 1.0, "kg")
            .await
            .unwrap_err();
        assert!(matches!(err, ConsumptionError::ItemNotFound));
        assert_eq!(err.to_string(), "Item not found in inventory");
    }

    #[tokio::test]
    async fn over_consumption_leaves_store_unchanged() {
        let svc = seeded().await;
        let before = svc.store.list_items().await.unwrap();

        let err = svc
            .log_consumption("user_1", "inv_003", 0.75, "kg")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConsumptionError::InsufficientQuantity { available } if available == 0.5
        ));
        assert_eq!(err.to_string(), "Insufficient quantity. Available: 0.5");
        assert_eq!(svc.store.list_items().await.unwrap(), before);
        assert_eq!(svc.store.log_count().await.unwrap(), 0);
        assert_eq!(svc.store.alert_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected() {
        let svc = seeded().await;
        for q in [0.0, -2.0, f64::NAN] {
            let err = svc
                .log_consumption("user_1", "inv_002", q, "kg")
                .await
                .unwrap_err();
            assert!(matches!(err, ConsumptionError::InvalidQuantity));
        }
        assert_eq!(svc.store.get_item("inv_002").await.unwrap().unwrap().quantity, 2.0);
    }

    #[tokio::test]
    async fn expired_item_consumption_returns_warning() {
        let svc = seeded().await;
        let outcome = svc
            .log_consumption("user_1", "inv_001", 0.5, "liters")
            .await
            .unwrap();

        let alert = outcome.expired_alert.as_ref().expect("milk is expired");
        assert_eq!(alert.item_id, "inv_001");
        assert_eq!(alert.days_expired, 1);
        assert_eq!(alert.message, "Warning: Milk expired 1 days ago.");
        assert!(outcome.log.was_expired);
        assert_eq!(outcome.message(), "Consumption logged (EXPIRED ITEM ALERT!)");
        assert_eq!(svc.store.get_item("inv_001").await.unwrap().unwrap().quantity, 1.0);
    }

    #[tokio::test]
    async fn fresh_item_consumption_has_no_warning() {
        let svc = seeded().await;
        let outcome = svc
            .log_consumption("user_1", "inv_002", 1.0, "kg")
            .await
            .unwrap();
        assert!(outcome.expired_alert.is_none());
        assert!(!outcome.log.was_expired);
        assert_eq!(outcome.log.id, "log_0");
        assert_eq!(
            outcome.message(),
            "Consumption logged successfully and risks recalculated"
        );
    }

    #[tokio::test]
    async fn depleted_item_leaves_views_but_stays_in_store() {
        let svc = seeded().await;
        let outcome = svc
            .log_consumption("user_1", "inv_003", 0.5, "kg")
            .await
            .unwrap();

        assert_eq!(outcome.updated_inventory.len(), 5);
        assert!(outcome.updated_inventory.iter().all(|i| i.id != "inv_003"));
        assert!(outcome.risk_assessments.iter().all(|r| r.item_id != "inv_003"));
        assert!(svc.inventory_risks().await.unwrap().iter().all(|r| r.item_id != "inv_003"));

        let salmon = svc.store.get_item("inv_003").await.unwrap().unwrap();
        assert_eq!(salmon.quantity, 0.0);
        assert!(svc.item_risk("inv_003").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn priority_list_is_capped_and_sorted() {
        let svc = seeded().await;
        for n in 0..8 {
            svc.add_item(meat_item(&format!("extra_{n}"), n * 7, 20 + n))
                .await
                .unwrap();
        }
        let outcome = svc
            .log_consumption("user_1", "inv_004", 1.0, "cans")
            .await
            .unwrap();

        assert_eq!(outcome.risk_assessments.len(), 14);
        assert_eq!(outcome.priority_list.len(), 10);
        for pair in outcome.priority_list.windows(2) {
            assert!(pair[0].consumption_priority >= pair[1].consumption_priority);
        }
        assert_eq!(outcome.priority_list[..], outcome.risk_assessments[..10]);
    }

    #[tokio::test]
    async fn consumption_resets_frequency_for_that_item() {
        let svc = seeded().await;
        let before = svc.item_risk("inv_002").await.unwrap().unwrap();
        svc.log_consumption("user_1", "inv_002", 0.5, "kg")
            .await
            .unwrap();
        let after = svc.item_risk("inv_002").await.unwrap().unwrap();

        assert_eq!(before.factors.consumption_frequency, 80.0);
        assert_eq!(after.factors.consumption_frequency, 20.0);
    }

    #[tokio::test]
    async fn repeated_consumption_accumulates_duplicate_alerts() {
        let svc = seeded().await;
        let first = svc
            .log_consumption("user_1", "inv_002", 0.5, "kg")
            .await
            .unwrap();
        let second = svc
            .log_consumption("user_1", "inv_002", 0.5, "kg")
            .await
            .unwrap();

        assert!(!first.new_alerts.is_empty());
        assert!(first
            .new_alerts
            .iter()
            .all(|a| matches!(a.alert_type, RiskLevel::High | RiskLevel::Critical)));

        let unread = svc.unread_alerts().await.unwrap();
        assert_eq!(unread.len(), first.new_alerts.len() + second.new_alerts.len());
        let milk_alerts = unread.iter().filter(|a| a.item_id == "inv_001").count();
        assert_eq!(milk_alerts, 2);
        assert_eq!(second.new_alerts[0].id, format!("alert_{}", first.new_alerts.len()));
    }

    #[tokio::test]
    async fn dismissing_alerts() {
        let svc = seeded().await;
        svc.log_consumption("user_1", "inv_002", 0.5, "kg")
            .await
            .unwrap();
        let unread = svc.unread_alerts().await.unwrap();
        let total = unread.len();

        assert!(!svc.dismiss_alert("alert_999").await.unwrap());
        assert_eq!(svc.unread_alerts().await.unwrap().len(), total);

        assert!(svc.dismiss_alert(&unread[0].id).await.unwrap());
        assert_eq!(svc.unread_alerts().await.unwrap().len(), total - 1);
    }

    #[tokio::test]
    async fn history_and_summary() {
        let svc = seeded().await;
        svc.log_consumption("user_1", "inv_002", 0.5, "kg").await.unwrap();
        svc.log_consumption("user_1", "inv_001", 0.5, "liters").await.unwrap();
        svc.log_consumption("user_1", "inv_002", 0.25, "kg").await.unwrap();

        let history = svc.consumption_history(Some(2)).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, "log_2");
        assert_eq!(history[1].id, "log_1");

        let summary = svc.consumption_summary().await.unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].item_id, "inv_002");
        assert_eq!(summary[0].times_consumed, 2);
        assert_eq!(summary[0].total_quantity, 0.75);
        assert_eq!(summary[1].expired_consumptions, 1);
    }

    #[tokio::test]
    async fn reseeding_restores_demo_quantities() {
        let svc = seeded().await;
        svc.log_consumption("user_1", "inv_004", 3.0, "cans").await.unwrap();
        let (items, risks) = svc.seed_demo_inventory().await.unwrap();

        assert_eq!(items.len(), 6);
        assert_eq!(risks.len(), 6);
        assert_eq!(svc.store.get_item("inv_004").await.unwrap().unwrap().quantity, 3.0);
    }

    #[tokio::test]
    async fn editing_an_item_keeps_its_recency() {
        let svc = seeded().await;
        svc.log_consumption("user_1", "inv_002", 0.5, "kg")
            .await
            .unwrap();

        let (item, risk) = svc
            .update_item("inv_002", |item| {
                item.quantity = 4.0;
                item.id = "hijacked".into();
            })
            .await
            .unwrap();
        assert_eq!(item.id, "inv_002");
        assert_eq!(item.quantity, 4.0);
        assert_eq!(risk.factors.consumption_frequency, 20.0);
        assert!(svc.store.get_item("hijacked").await.unwrap().is_none());

        let err = svc
            .update_item("inv_002", |item| item.quantity = -2.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ItemUpdateError::Invalid(_)));
        assert_eq!(svc.store.get_item("inv_002").await.unwrap().unwrap().quantity, 4.0);

        let err = svc.update_item("inv_404", |_| {}).await.unwrap_err();
        assert!(matches!(err, ItemUpdateError::NotFound));
    }

    #[tokio::test]
    async fn deleted_items_leave_every_view() {
        let svc = seeded().await;
        assert!(svc.delete_item("inv_003").await.unwrap());
        assert!(!svc.delete_item("inv_003").await.unwrap());

        assert_eq!(svc.list_items().await.unwrap().len(), 5);
        assert!(svc.item_risk("inv_003").await.unwrap().is_none());
        assert!(svc
            .expiring_items(3)
            .await
            .unwrap()
            .iter()
            .all(|i| i.id != "inv_003"));
    }
}
