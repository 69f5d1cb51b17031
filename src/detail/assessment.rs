//! Collapsible assessment container; the expanded flag survives page loads.

use tracing::debug;

use crate::store::{keys, KeyValueStore, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssessmentPanel {
    expanded: bool,
}

impl AssessmentPanel {
    /// Read the persisted flag; anything other than `true` means collapsed.
    pub fn load(store: &dyn KeyValueStore) -> StoreResult<Self> {
        let expanded = store.get(keys::ASSESSMENT_EXPANDED)?.as_deref() == Some("true");
        Ok(Self { expanded })
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, store: &dyn KeyValueStore, expanded: bool) -> StoreResult<()> {
        self.expanded = expanded;
        debug!("Assessment panel expanded = {}", expanded);
        store.set(keys::ASSESSMENT_EXPANDED, if expanded { "true" } else { "false" })
    }

    pub fn toggle(&mut self, store: &dyn KeyValueStore) -> StoreResult<bool> {
        self.set_expanded(store, !self.expanded)?;
        Ok(self.expanded)
    }
}
