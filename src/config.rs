use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub default_days_since_consumed: i64,
    pub priority_list_limit: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_days_since_consumed: 30,
            priority_list_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub scoring: ScoringConfig,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = ScoringConfig::default();
        let host = get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("APP_PORT={raw}: {e}"))?,
            None => 8080,
        };
        let scoring = ScoringConfig {
            default_days_since_consumed: get("DEFAULT_DAYS_SINCE_CONSUMED")
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|d| *d >= 0)
                .unwrap_or(defaults.default_days_since_consumed),
            priority_list_limit: get("PRIORITY_LIST_LIMIT")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.priority_list_limit),
        };
        let seed_demo_data = get("SEED_DEMO_DATA")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            scoring,
            seed_demo_data,
        })
    }
}
