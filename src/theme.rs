//! Light/dark preference.

use tracing::{debug, warn};

use crate::models::Theme;
use crate::store::{keys, KeyValueStore, StoreResult};

/// Current `data-bs-theme` value of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeToggle {
    current: Theme,
}

impl ThemeToggle {
    /// Apply the persisted theme if one exists, otherwise keep `initial`.
    pub fn load(store: &dyn KeyValueStore, initial: Theme) -> StoreResult<Self> {
        let current = match store.get(keys::THEME)? {
            Some(saved) => saved.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored theme: {}", e);
                initial
            }),
            None => initial,
        };
        Ok(Self { current })
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip and persist; returns the new theme.
    pub fn toggle(&mut self, store: &dyn KeyValueStore) -> StoreResult<Theme> {
        self.current = self.current.flipped();
        store.set(keys::THEME, self.current.as_str())?;
        debug!("Theme switched to {}", self.current.as_str());
        Ok(self.current)
    }
}
