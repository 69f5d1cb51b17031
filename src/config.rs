//! Configuration management for the tracker client using the prefer crate.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default backend address (the tracker's Flask app listens on port 8000).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Backend endpoint paths, relative to the base URL.
///
/// The server hands these to the page as data attributes; here they are
/// configurable with the server's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, prefer::FromValue)]
pub struct EndpointPaths {
    #[serde(default = "default_status")]
    #[prefer(default = "/api/change-status")]
    pub status: String,
    #[serde(default = "default_classification")]
    #[prefer(default = "/api/change-classification")]
    pub classification: String,
    #[serde(default = "default_links")]
    #[prefer(default = "/api/links")]
    pub links: String,
    #[serde(default = "default_evaluation_status")]
    #[prefer(default = "/api/change-evaluation-status")]
    pub evaluation_status: String,
    #[serde(default = "default_reasoning_and_measures")]
    #[prefer(default = "/api/change-reasoning-and-measures")]
    pub reasoning_and_measures: String,
    #[serde(default = "default_file_upload")]
    #[prefer(default = "/api/file-upload")]
    pub file_upload: String,
    #[serde(default = "default_file_export")]
    #[prefer(default = "/api/file-export")]
    pub file_export: String,
    #[serde(default = "default_upgrade_initiate")]
    #[prefer(default = "/upgrade/initiate")]
    pub upgrade_initiate: String,
}

fn default_status() -> String {
    "/api/change-status".to_string()
}
fn default_classification() -> String {
    "/api/change-classification".to_string()
}
fn default_links() -> String {
    "/api/links".to_string()
}
fn default_evaluation_status() -> String {
    "/api/change-evaluation-status".to_string()
}
fn default_reasoning_and_measures() -> String {
    "/api/change-reasoning-and-measures".to_string()
}
fn default_file_upload() -> String {
    "/api/file-upload".to_string()
}
fn default_file_export() -> String {
    "/api/file-export".to_string()
}
fn default_upgrade_initiate() -> String {
    "/upgrade/initiate".to_string()
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            status: default_status(),
            classification: default_classification(),
            links: default_links(),
            evaluation_status: default_evaluation_status(),
            reasoning_and_measures: default_reasoning_and_measures(),
            file_upload: default_file_upload(),
            file_export: default_file_export(),
            upgrade_initiate: default_upgrade_initiate(),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Backend base URL.
    pub base_url: String,
    /// Endpoint paths below the base URL.
    pub endpoints: EndpointPaths,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Filename of the local key-value store inside the data directory.
    pub store_filename: String,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("attack-tracker");

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: EndpointPaths::default(),
            user_agent: concat!("attack-tracker/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout: 30,
            data_dir,
            store_filename: "state.db".to_string(),
        }
    }
}

impl Settings {
    /// Get the full path to the key-value store.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.store_filename)
    }

    /// Ensure all directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Endpoint path overrides.
    #[serde(default)]
    pub endpoints: Option<EndpointPaths>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Data directory (supports `~`).
    #[serde(default)]
    pub data_dir: Option<String>,
    /// Store filename.
    #[serde(default)]
    pub store: Option<String>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers attack-tracker config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("attack-tracker").await {
            Ok(pref_config) => {
                let base_url: Option<String> = pref_config.get("base_url").ok();
                let endpoints: Option<EndpointPaths> = pref_config.get("endpoints").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
                let data_dir: Option<String> = pref_config.get("data_dir").ok();
                let store: Option<String> = pref_config.get("store").ok();

                Config {
                    base_url,
                    endpoints,
                    user_agent,
                    request_timeout,
                    data_dir,
                    store,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref base_url) = self.base_url {
            settings.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(ref endpoints) = self.endpoints {
            settings.endpoints = endpoints.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref data_dir) = self.data_dir {
            let path = shellexpand::tilde(data_dir);
            settings.data_dir = PathBuf::from(path.as_ref());
        }
        if let Some(ref store) = self.store {
            settings.store_filename = store.clone();
        }
    }
}

/// Load settings from configuration (async version).
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}
