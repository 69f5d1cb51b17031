//! Changes overview page: one row per change of an upgrade with status,
//! progress headings and the status filter.

mod filter;
mod progress;
mod status;

pub use filter::{stored_filter, FilterManager};
pub use progress::{format_percentage, percentage, ProgressTracker};
pub use status::{StatusIcon, StatusTracker};

use tracing::debug;

use crate::api::{ApiError, Backend};
use crate::models::{ChangeId, ChangeRow, CompletionStatus, StatusFilter, VersionPair};
use crate::navigation::{Restoration, ScrollStateManager};
use crate::store::{KeyValueStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum OverviewError {
    #[error("Change {0} is not on this page")]
    UnknownChange(ChangeId),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct ChangesOverviewPage {
    pair: VersionPair,
    status: StatusTracker,
    filter: FilterManager,
    restoration: Option<Restoration>,
}

impl ChangesOverviewPage {
    /// Page load: restore the filter and consume the scroll/highlight markers.
    pub fn load(
        store: &dyn KeyValueStore,
        pair: VersionPair,
        rows: Vec<ChangeRow>,
    ) -> Result<Self, OverviewError> {
        let status = StatusTracker::new(pair.clone(), rows);
        let mut filter = FilterManager::new(pair.clone());
        filter.restore(store, status.progress())?;
        let restoration = ScrollStateManager::new(store).on_overview_load()?;
        debug!("Overview {} loaded with {} rows", pair, status.progress().rows().len());

        Ok(Self {
            pair,
            status,
            filter,
            restoration,
        })
    }

    pub fn pair(&self) -> &VersionPair {
        &self.pair
    }

    pub fn status(&self) -> &StatusTracker {
        &self.status
    }

    pub fn filter(&self) -> &FilterManager {
        &self.filter
    }

    /// Where to scroll and what to highlight after this load, if anything.
    pub fn restoration(&self) -> Option<&Restoration> {
        self.restoration.as_ref()
    }

    pub fn visible_rows(&self) -> Vec<&ChangeRow> {
        let progress = self.status.progress();
        self.filter
            .visible_rows(progress)
            .filter_map(|id| progress.row(id))
            .collect()
    }

    pub fn select_filter(&mut self, store: &dyn KeyValueStore, filter: StatusFilter) -> Result<(), OverviewError> {
        self.filter.select(store, self.status.progress(), filter)?;
        Ok(())
    }

    pub async fn change_status<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        id: &ChangeId,
        status: CompletionStatus,
    ) -> Result<StatusIcon, OverviewError> {
        self.status.change_status(backend, id, status).await
    }

    /// A change link was clicked at the given scroll offset.
    pub fn open_change(
        &self,
        store: &dyn KeyValueStore,
        id: &ChangeId,
        scroll_offset: Option<f64>,
    ) -> Result<(), OverviewError> {
        ScrollStateManager::new(store).remember_click(id, scroll_offset)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::navigation::ScrollTarget;
    use crate::store::MemoryStore;
    use crate::models::CompletionStatus::*;

    fn rows() -> Vec<ChangeRow> {
        vec![
            ChangeRow::new("T1001", "additions", Done),
            ChangeRow::new("T1002", "additions", NotDone),
            ChangeRow::new("T1003", "revocations", Done),
        ]
    }

    fn pair() -> VersionPair {
        VersionPair::new("v15.1", "v16.0")
    }

    #[test]
    fn test_reload_shows_only_done_rows() {
        let store = MemoryStore::new();
        let mut page = ChangesOverviewPage::load(&store, pair(), rows()).unwrap();
        page.select_filter(&store, StatusFilter::Only(Done)).unwrap();

        let page = ChangesOverviewPage::load(&store, pair(), rows()).unwrap();
        let ids: Vec<&str> = page.visible_rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["T1001", "T1003"]);
        assert_eq!(page.filter().checked_option(), "btnradio2");
    }

    #[test]
    fn test_click_then_reload_restores_position_once() {
        let store = MemoryStore::new();
        let page = ChangesOverviewPage::load(&store, pair(), rows()).unwrap();
        assert!(page.restoration().is_none());
        page.open_change(&store, &ChangeId::new("T1002"), Some(512.0)).unwrap();

        let page = ChangesOverviewPage::load(&store, pair(), rows()).unwrap();
        let restoration = page.restoration().unwrap();
        assert_eq!(restoration.target, ScrollTarget::Offset(512.0));
        assert_eq!(restoration.highlight, "T1002");

        let page = ChangesOverviewPage::load(&store, pair(), rows()).unwrap();
        assert!(page.restoration().is_none());
    }

    #[tokio::test]
    async fn test_status_change_does_not_refilter() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        let mut page = ChangesOverviewPage::load(&store, pair(), rows()).unwrap();
        page.select_filter(&store, StatusFilter::Only(NotDone)).unwrap();

        page.change_status(&backend, &ChangeId::new("T1002"), Done).await.unwrap();

        assert_eq!(page.visible_rows().len(), 1);
        assert_eq!(page.status().progress().total_text(), "Total: 100.00%");
    }
}
