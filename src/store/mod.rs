//! Client-side persistent key-value store.
//!
//! Mirrors the browser's local storage: flat string entries, synchronous
//! access, no transactions across keys.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::models::VersionPair;

/// Errors raised by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Flat string key-value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Well-known keys.
pub mod keys {
    use super::VersionPair;

    /// Global light/dark preference.
    pub const THEME: &str = "bs-theme";
    /// Element id of the change row to highlight on the next overview load.
    pub const HIGHLIGHT_ID: &str = "highlightID";
    /// Overview scroll offset saved alongside the highlight id.
    pub const SCROLL_POSITION: &str = "scrollPosition";
    /// Whether the assessment container is expanded.
    pub const ASSESSMENT_EXPANDED: &str = "expanded";

    /// Filter key, scoped by version pair.
    pub fn filter(pair: &VersionPair) -> String {
        format!("filter-{}-{}", pair.from, pair.to)
    }
}
