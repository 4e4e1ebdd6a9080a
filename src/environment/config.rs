use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::storage::KeyValueStore;

const CONFIG_KEY: &str = "config";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Quiet period before a state change is written to storage
    pub persist_debounce_ms: u64,
    /// How long an error message stays before it's cleared
    pub error_display_ms: u64,
    pub state_key: String,
    pub theme_key: String,
    pub auth_key: String,
    pub drafts_key: String,
    pub analytics_endpoint: Option<Url>,
    pub data_directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            persist_debounce_ms: 100,
            error_display_ms: 5000,
            state_key: "geev_state".to_string(),
            theme_key: "theme".to_string(),
            auth_key: "geev_auth".to_string(),
            drafts_key: "geev_drafts".to_string(),
            analytics_endpoint: None,
            data_directory: None,
        }
    }
}

impl Config {
    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }

    /// Read `config.json` from `storage` (if there is one) and apply the
    /// `GEEV_*` environment overrides on top.
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        let mut config = match storage.get_item(CONFIG_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::error!("Could not parse config, using defaults: {e:?}");
                Config::default()
            }),
            Ok(None) => Config::default(),
            Err(e) => {
                log::error!("Could not read config, using defaults: {e}");
                Config::default()
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(value) = var("GEEV_PERSIST_DEBOUNCE_MS").and_then(|v| v.parse().ok()) {
            self.persist_debounce_ms = value;
        }
        if let Some(value) = var("GEEV_ERROR_DISPLAY_MS").and_then(|v| v.parse().ok()) {
            self.error_display_ms = value;
        }
        if let Some(value) = var("GEEV_ANALYTICS_URL") {
            match Url::parse(&value) {
                Ok(url) => self.analytics_endpoint = Some(url),
                Err(e) => log::warn!("Ignoring invalid GEEV_ANALYTICS_URL {value:?}: {e}"),
            }
        }
        if let Some(value) = var("GEEV_DATA_DIR") {
            self.data_directory = Some(PathBuf::from(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::storage::MemoryStore;
    use std::collections::HashMap;

    #[test]
    fn partial_config_keeps_defaults() {
        let storage = MemoryStore::with_items([("config", r#"{"persistDebounceMs": 250}"#)]);
        let config = Config::load(&storage);
        assert_eq!(config.persist_debounce(), Duration::from_millis(250));
        assert_eq!(config.state_key, "geev_state");
        assert_eq!(config.error_display_ms, 5000);
    }

    #[test]
    fn broken_config_falls_back() {
        let storage = MemoryStore::with_items([("config", "{nope")]);
        let config = Config::load(&storage);
        assert_eq!(config.persist_debounce_ms, 100);
    }

    #[test]
    fn overrides() {
        let vars: HashMap<&str, &str> = [
            ("GEEV_PERSIST_DEBOUNCE_MS", "20"),
            ("GEEV_ANALYTICS_URL", "https://geev.example/api/analytics/events"),
            ("GEEV_ERROR_DISPLAY_MS", "not a number"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.persist_debounce_ms, 20);
        assert_eq!(config.error_display_ms, 5000);
        assert_eq!(
            config.analytics_endpoint.map(|u| u.to_string()),
            Some("https://geev.example/api/analytics/events".to_string())
        );
    }
}
