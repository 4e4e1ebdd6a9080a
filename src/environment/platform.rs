use std::sync::{Arc, Mutex};

use super::types::Theme;

/// The presentation layer the store drives directly
pub trait Platform: Send + Sync {
    /// Toggle the stylesheet level dark mode flag
    fn apply_theme(&self, theme: Theme);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPlatform;

impl Platform for HeadlessPlatform {
    fn apply_theme(&self, theme: Theme) {
        log::debug!("dark mode: {}", theme.is_dark());
    }
}

/// Remembers the last applied theme
#[derive(Debug, Clone, Default)]
pub struct RecordingPlatform {
    applied: Arc<Mutex<Vec<Theme>>>,
}

impl RecordingPlatform {
    pub fn applied(&self) -> Vec<Theme> {
        self.applied.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn is_dark(&self) -> bool {
        self.applied().last().map(Theme::is_dark).unwrap_or_default()
    }
}

impl Platform for RecordingPlatform {
    fn apply_theme(&self, theme: Theme) {
        if let Ok(mut applied) = self.applied.lock() {
            applied.push(theme);
        }
    }
}
