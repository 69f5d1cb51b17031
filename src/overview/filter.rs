//! Status filter over the changes overview, remembered per upgrade.

use std::collections::HashSet;

use tracing::{info, warn};

use super::progress::ProgressTracker;
use crate::models::{ChangeId, StatusFilter, VersionPair};
use crate::store::{keys, KeyValueStore, StoreResult};

/// Filter stored for `pair`; missing or unrecognised values mean `All`.
pub fn stored_filter(store: &dyn KeyValueStore, pair: &VersionPair) -> StoreResult<StatusFilter> {
    let raw = match store.get(&keys::filter(pair))? {
        Some(raw) => raw,
        None => return Ok(StatusFilter::All),
    };
    Ok(raw.parse().unwrap_or_else(|e| {
        warn!("Ignoring stored filter for {}: {}", pair, e);
        StatusFilter::All
    }))
}

/// Radio selection plus the rows it hides.
///
/// Visibility is decided when a filter is applied; a row whose status changes
/// afterwards stays where it is until the next selection or reload.
#[derive(Debug, Clone)]
pub struct FilterManager {
    pair: VersionPair,
    active: StatusFilter,
    hidden: HashSet<ChangeId>,
}

impl FilterManager {
    pub fn new(pair: VersionPair) -> Self {
        Self {
            pair,
            active: StatusFilter::All,
            hidden: HashSet::new(),
        }
    }

    pub fn active(&self) -> StatusFilter {
        self.active
    }

    /// Element id of the checked radio button (`btnradio1`..`btnradio4`).
    pub fn checked_option(&self) -> String {
        let position = StatusFilter::OPTIONS
            .iter()
            .position(|option| *option == self.active)
            .unwrap_or(0);
        format!("btnradio{}", position + 1)
    }

    pub fn is_visible(&self, id: &ChangeId) -> bool {
        !self.hidden.contains(id)
    }

    /// Ids of the rows currently shown, in overview order.
    pub fn visible_rows<'a>(&'a self, rows: &'a ProgressTracker) -> impl Iterator<Item = &'a ChangeId> + 'a {
        rows.rows()
            .iter()
            .map(|row| &row.id)
            .filter(move |id| self.is_visible(id))
    }

    fn apply(&mut self, filter: StatusFilter, rows: &ProgressTracker) {
        self.active = filter;
        self.hidden = rows
            .rows()
            .iter()
            .filter(|row| !filter.matches(row.status))
            .map(|row| row.id.clone())
            .collect();
    }

    /// The user clicked a filter option.
    pub fn select(
        &mut self,
        store: &dyn KeyValueStore,
        rows: &ProgressTracker,
        filter: StatusFilter,
    ) -> StoreResult<()> {
        self.apply(filter, rows);
        store.set(&keys::filter(&self.pair), filter.label())
    }

    /// Page load: re-apply the filter stored for this upgrade.
    pub fn restore(&mut self, store: &dyn KeyValueStore, rows: &ProgressTracker) -> StoreResult<StatusFilter> {
        let filter = stored_filter(store, &self.pair)?;
        self.apply(filter, rows);
        if filter != StatusFilter::All {
            info!("Restored filter {} for {} ({} rows hidden)", filter, self.pair, self.hidden.len());
        }
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChangeRow, CompletionStatus::*};
    use crate::store::MemoryStore;

    fn pair() -> VersionPair {
        VersionPair::new("v15.1", "v16.0")
    }

    fn rows() -> ProgressTracker {
        ProgressTracker::new(vec![
            ChangeRow::new("T1001", "additions", Done),
            ChangeRow::new("T1002", "additions", NotDone),
            ChangeRow::new("T1003", "revocations", Done),
            ChangeRow::new("T1004", "revocations", InProgress),
        ])
    }

    fn visible(filter: &FilterManager, rows: &ProgressTracker) -> Vec<String> {
        filter.visible_rows(rows).map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_done_filter_round_trip() {
        let store = MemoryStore::new();
        let rows = rows();
        let mut filter = FilterManager::new(pair());
        filter.select(&store, &rows, StatusFilter::Only(Done)).unwrap();
        assert_eq!(store.get("filter-v15.1-v16.0").unwrap().as_deref(), Some("Done"));

        // Reload
        let mut reloaded = FilterManager::new(pair());
        let restored = reloaded.restore(&store, &rows).unwrap();

        assert_eq!(restored, StatusFilter::Only(Done));
        assert_eq!(visible(&reloaded, &rows), vec!["T1001", "T1003"]);
        assert_eq!(reloaded.checked_option(), "btnradio2");
    }

    #[test]
    fn test_filters_are_scoped_per_upgrade() {
        let store = MemoryStore::new();
        let rows = rows();
        FilterManager::new(pair())
            .select(&store, &rows, StatusFilter::Only(NotDone))
            .unwrap();

        let mut other = FilterManager::new(VersionPair::new("v16.0", "v16.1"));
        assert_eq!(other.restore(&store, &rows).unwrap(), StatusFilter::All);
        assert_eq!(visible(&other, &rows).len(), 4);
        assert_eq!(other.checked_option(), "btnradio1");
    }

    #[test]
    fn test_garbage_value_falls_back_to_all() {
        let store = MemoryStore::new();
        store.set(&keys::filter(&pair()), "Someday").unwrap();
        assert_eq!(stored_filter(&store, &pair()).unwrap(), StatusFilter::All);
    }

    #[test]
    fn test_hidden_rows_still_count_toward_progress() {
        let store = MemoryStore::new();
        let rows = rows();
        let mut filter = FilterManager::new(pair());
        filter.select(&store, &rows, StatusFilter::Only(InProgress)).unwrap();

        assert_eq!(visible(&filter, &rows), vec!["T1004"]);
        assert_eq!(rows.overall(), Some(50.0));
    }
}
