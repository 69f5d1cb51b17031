//! Prev/next links and the scroll/highlight markers carried between the
//! overview and detail pages.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::{ApiResult, Backend, LinksRequest};
use crate::detail::ChangeContext;
use crate::models::{ChangeId, StatusFilter};
use crate::store::{keys, KeyValueStore, StoreResult};

/// Fixed navbar height subtracted when scrolling an element into view.
pub const NAVBAR_OFFSET: f64 = 80.0;

/// How long the restored row stays highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(5);

/// A previous/next button.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavControl {
    Enabled(String),
    /// Rendered with the `disabled` class; not clickable.
    #[default]
    Disabled,
}

impl NavControl {
    fn from_url(url: Option<String>) -> Self {
        match url {
            Some(url) if !url.trim().is_empty() => Self::Enabled(url),
            _ => Self::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Enabled(url) => Some(url),
            Self::Disabled => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationLinks {
    pub prev: NavControl,
    pub next: NavControl,
}

impl NavigationLinks {
    /// Ask the backend for the neighbours of a change under `filter`.
    pub async fn fetch<B: Backend + ?Sized>(
        backend: &B,
        context: &ChangeContext,
        filter: StatusFilter,
        category: Option<&str>,
    ) -> ApiResult<Self> {
        let request = LinksRequest {
            change: context.change_ref(),
            filter: filter.label().to_string(),
            category: category.map(str::to_string),
        };
        debug!("Fetching links for {} (filter {})", context.id, filter);

        let response = backend.fetch_links(&request).await.map_err(|e| {
            warn!("Links lookup for {} failed: {}", context.id, e);
            e
        })?;

        Ok(Self {
            prev: NavControl::from_url(response.prev_url),
            next: NavControl::from_url(response.next_url),
        })
    }
}

/// Where the overview should scroll after a load.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    /// Saved absolute offset.
    Offset(f64),
    /// Scroll the element into view, `offset` pixels higher to clear the navbar.
    Element { id: String, offset: f64 },
}

/// Outcome of restoring the overview position.
#[derive(Debug, Clone, PartialEq)]
pub struct Restoration {
    pub target: ScrollTarget,
    /// Element id whose row is highlighted.
    pub highlight: String,
    pub highlight_for: Duration,
}

/// Reads and writes the two transient markers. They are independent entries.
pub struct ScrollStateManager<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ScrollStateManager<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// A change link on the overview was clicked.
    pub fn remember_click(&self, id: &ChangeId, scroll_offset: Option<f64>) -> StoreResult<()> {
        self.store.set(keys::HIGHLIGHT_ID, id.as_str())?;
        match scroll_offset {
            Some(offset) => self.store.set(keys::SCROLL_POSITION, &offset.to_string()),
            None => self.store.remove(keys::SCROLL_POSITION),
        }
    }

    /// The detail page for `id` loaded; prev/next navigation lands the overview on it.
    ///
    /// A saved offset only belongs to the change that was clicked, so it is
    /// dropped once the user has moved on to another change.
    pub fn on_detail_load(&self, id: &ChangeId) -> StoreResult<()> {
        if self.store.get(keys::HIGHLIGHT_ID)?.as_deref() != Some(id.as_str()) {
            self.store.remove(keys::SCROLL_POSITION)?;
        }
        self.store.set(keys::HIGHLIGHT_ID, id.as_str())
    }

    /// Overview load: consume the markers so a plain reload does not highlight again.
    pub fn on_overview_load(&self) -> StoreResult<Option<Restoration>> {
        let highlight = match self.store.get(keys::HIGHLIGHT_ID)? {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let saved_offset = self
            .store
            .get(keys::SCROLL_POSITION)?
            .and_then(|raw| raw.parse::<f64>().ok());

        self.store.remove(keys::HIGHLIGHT_ID)?;
        self.store.remove(keys::SCROLL_POSITION)?;

        let target = match saved_offset {
            Some(offset) => ScrollTarget::Offset(offset),
            None => ScrollTarget::Element {
                id: highlight.clone(),
                offset: NAVBAR_OFFSET,
            },
        };
        info!("Restoring overview position at {}", highlight);

        Ok(Some(Restoration {
            target,
            highlight,
            highlight_for: HIGHLIGHT_DURATION,
        }))
    }
}
