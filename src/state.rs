use crate::config::AppConfig;
use crate::consumption::services::ConsumptionService;
use crate::store::{InventoryStore, MemoryStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub consumption: Arc<ConsumptionService>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        // In-memory only; swap the store here for a persistent one.
        let store = Arc::new(MemoryStore::new()) as Arc<dyn InventoryStore>;
        let state = Self::from_parts(config, store);

        if state.config.seed_demo_data {
            let (items, _) = state.consumption.seed_demo_inventory().await?;
            tracing::info!(count = items.len(), "seeded demo inventory at startup");
        }

        Ok(state)
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn InventoryStore>) -> Self {
        let consumption = Arc::new(ConsumptionService::new(store, config.scoring.clone()));
        Self {
            config,
            consumption,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    #[cfg(test)]
    pub fn with_store(store: Arc<dyn InventoryStore>) -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            scoring: crate::config::ScoringConfig::default(),
            seed_demo_data: false,
        });
        Self::from_parts(config, store)
    }
}
