use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::alerts::repo_types::ExpirationAlert;
use crate::consumption::repo_types::ConsumptionLog;
use crate::inventory::repo_types::InventoryItem;

/// Repository behind the consumption service. Items keep insertion order so
/// rankings with equal priority come back in a predictable order.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Inserts or replaces an item (a replaced item keeps its position) and
    /// forgets when it was last consumed.
    async fn upsert_item(&self, item: InventoryItem) -> anyhow::Result<()>;
    async fn get_item(&self, id: &str) -> anyhow::Result<Option<InventoryItem>>;
    async fn list_items(&self) -> anyhow::Result<Vec<InventoryItem>>;
    /// Overwrites an existing item in place, keeping its consumption recency.
    /// Returns false when no item has this id.
    async fn replace_item(&self, item: InventoryItem) -> anyhow::Result<bool>;
    /// Removes an item and its consumption recency. Logs and alerts that
    /// mention it are kept.
    async fn delete_item(&self, id: &str) -> anyhow::Result<bool>;
    async fn set_quantity(&self, id: &str, quantity: f64) -> anyhow::Result<Option<InventoryItem>>;

    async fn record_consumed(&self, id: &str, at: OffsetDateTime) -> anyhow::Result<()>;
    async fn last_consumed(&self) -> anyhow::Result<HashMap<String, OffsetDateTime>>;

    async fn append_log(&self, log: ConsumptionLog) -> anyhow::Result<()>;
    async fn list_logs(&self) -> anyhow::Result<Vec<ConsumptionLog>>;
    async fn log_count(&self) -> anyhow::Result<usize>;

    async fn append_alerts(&self, alerts: Vec<ExpirationAlert>) -> anyhow::Result<()>;
    async fn list_alerts(&self) -> anyhow::Result<Vec<ExpirationAlert>>;
    async fn alert_count(&self) -> anyhow::Result<usize>;
    /// Returns false when no alert has this id.
    async fn mark_alert_read(&self, id: &str) -> anyhow::Result<bool>;
}

#[derive(Debug, Default)]
struct Tables {
    items: Vec<InventoryItem>,
    last_consumed: HashMap<String, OffsetDateTime>,
    logs: Vec<ConsumptionLog>,
    alerts: Vec<ExpirationAlert>,
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn upsert_item(&self, item: InventoryItem) -> anyhow::Result<()> {
        let mut t = self.tables.write().await;
        t.last_consumed.remove(&item.id);
        match t.items.iter().position(|i| i.id == item.id) {
            Some(idx) => t.items[idx] = item,
            None => t.items.push(item),
        }
        Ok(())
    }

    async fn get_item(&self, id: &str) -> anyhow::Result<Option<InventoryItem>> {
        let t = self.tables.read().await;
        Ok(t.items.iter().find(|i| i.id == id).cloned())
    }

    async fn list_items(&self) -> anyhow::Result<Vec<InventoryItem>> {
        Ok(self.tables.read().await.items.clone())
    }

    async fn replace_item(&self, item: InventoryItem) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        match t.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_item(&self, id: &str) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        let before = t.items.len();
        t.items.retain(|i| i.id != id);
        if t.items.len() == before {
            return Ok(false);
        }
        t.last_consumed.remove(id);
        Ok(true)
    }

    async fn set_quantity(&self, id: &str, quantity: f64) -> anyhow::Result<Option<InventoryItem>> {
        anyhow::ensure!(
            quantity.is_finite() && quantity >= 0.0,
            "invalid quantity {} for item {}",
            quantity,
            id
        );
        let mut t = self.tables.write().await;
        Ok(t.items.iter_mut().find(|i| i.id == id).map(|item| {
            item.quantity = quantity;
            item.clone()
        }))
    }

    async fn record_consumed(&self, id: &str, at: OffsetDateTime) -> anyhow::Result<()> {
        self.tables
            .write()
            .await
            .last_consumed
            .insert(id.to_string(), at);
        Ok(())
    }

    async fn last_consumed(&self) -> anyhow::Result<HashMap<String, OffsetDateTime>> {
        Ok(self.tables.read().await.last_consumed.clone())
    }

    async fn append_log(&self, log: ConsumptionLog) -> anyhow::Result<()> {
        self.tables.write().await.logs.push(log);
        Ok(())
    }

    async fn list_logs(&self) -> anyhow::Result<Vec<ConsumptionLog>> {
        Ok(self.tables.read().await.logs.clone())
    }

    async fn log_count(&self) -> anyhow::Result<usize> {
        Ok(self.tables.read().await.logs.len())
    }

    async fn append_alerts(&self, alerts: Vec<ExpirationAlert>) -> anyhow::Result<()> {
        self.tables.write().await.alerts.extend(alerts);
        Ok(())
    }

    async fn list_alerts(&self) -> anyhow::Result<Vec<ExpirationAlert>> {
        Ok(self.tables.read().await.alerts.clone())
    }

    async fn alert_count(&self) -> anyhow::Result<usize> {
        Ok(self.tables.read().await.alerts.len())
    }

    async fn mark_alert_read(&self, id: &str) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        match t.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
