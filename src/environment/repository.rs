use std::str::FromStr;
use std::sync::Arc;

use super::storage::KeyValueStore;
use super::types::Theme;
use crate::error::StorageError;

/// Typed access to the keys the store persists
#[derive(Clone)]
pub struct Repository {
    storage: Arc<dyn KeyValueStore>,
    state_key: String,
    theme_key: String,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("state_key", &self.state_key)
            .field("theme_key", &self.theme_key)
            .finish()
    }
}

impl Repository {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        state_key: impl Into<String>,
        theme_key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            state_key: state_key.into(),
            theme_key: theme_key.into(),
        }
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        self.storage.clone()
    }

    /// The raw persisted state snapshot
    pub fn snapshot(&self) -> Option<String> {
        match self.storage.get_item(&self.state_key) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Could not read state: {e}");
                None
            }
        }
    }

    pub fn set_snapshot(&self, raw: &str) -> Result<(), StorageError> {
        self.storage.set_item(&self.state_key, raw)
    }

    /// The saved theme preference. Unknown values count as no preference.
    pub fn theme(&self) -> Option<Theme> {
        let raw = match self.storage.get_item(&self.theme_key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::error!("Could not read theme: {e}");
                return None;
            }
        };
        Theme::from_str(raw.trim()).ok()
    }

    pub fn set_theme(&self, theme: Theme) {
        let value: &'static str = theme.into();
        if let Err(e) = self.storage.set_item(&self.theme_key, value) {
            log::error!("Could not save theme: {e}");
        }
    }
}
