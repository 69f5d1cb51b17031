//! Client state layer for tracking MITRE ATT&CK version upgrades.
//!
//! Each page of the tracker is modelled as a component holding explicit
//! view state. Components reach the server through [`api::Backend`] and
//! persist UI preferences through [`store::KeyValueStore`].

pub mod api;
pub mod config;
pub mod detail;
pub mod diff;
pub mod models;
pub mod navigation;
pub mod notice;
pub mod overview;
pub mod store;
pub mod theme;
pub mod transfer;
pub mod upgrade;

pub use api::{ApiError, ApiResult, Backend, BackendClient};
pub use config::{load_settings, Config, Settings};
pub use models::*;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
