//! Homepage: choosing the version to upgrade from and starting the upgrade.

use std::sync::OnceLock;
use std::time::Instant;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Backend};
use crate::notice::{Notice, NoticeLink, NoticeSlot};

fn version_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^v\d{1,2}\.\d{1,2}$").ok())
        .as_ref()
}

/// Whether `name` looks like an ATT&CK release (`v15.1`).
pub fn is_version_name(name: &str) -> bool {
    version_pattern().is_some_and(|re| re.is_match(name))
}

#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    #[error("Unknown version {0}")]
    UnknownVersion(String),
    #[error("{0} is already the newest version")]
    AlreadyNewest(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Version dropdown plus the list of started upgrades.
#[derive(Debug, Clone)]
pub struct UpgradeLauncher {
    /// Newest first, as the dropdown lists them.
    versions: Vec<String>,
    upgrades: Vec<NoticeLink>,
    status: NoticeSlot,
}

impl UpgradeLauncher {
    pub fn new(versions: Vec<String>) -> Self {
        let (versions, rejected): (Vec<_>, Vec<_>) =
            versions.into_iter().partition(|v| is_version_name(v));
        if !rejected.is_empty() {
            warn!("Skipping malformed version names: {}", rejected.join(", "));
        }
        Self {
            versions,
            upgrades: Vec::new(),
            status: NoticeSlot::default(),
        }
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Successor of `selected`; the list is in descending order.
    pub fn next_version(&self, selected: &str) -> Result<Option<&str>, UpgradeError> {
        let idx = self
            .versions
            .iter()
            .position(|v| v == selected)
            .ok_or_else(|| UpgradeError::UnknownVersion(selected.to_string()))?;
        Ok(idx.checked_sub(1).map(|prev| self.versions[prev].as_str()))
    }

    /// Help text shown under the dropdown.
    pub fn hint(&self, selected: &str) -> Result<String, UpgradeError> {
        Ok(match self.next_version(selected)? {
            Some(next) => format!(
                "You selected {} and you want to upgrade to {}. Is this correct?",
                selected, next
            ),
            None => "You are already on the newest version.".to_string(),
        })
    }

    /// Upgrade links, most recent first.
    pub fn upgrades(&self) -> &[NoticeLink] {
        &self.upgrades
    }

    pub fn status(&self, now: Instant) -> Option<&Notice> {
        self.status.visible(now)
    }

    /// Submit the upgrade form for `selected`.
    pub async fn initiate<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        selected: &str,
    ) -> Result<Notice, UpgradeError> {
        if self.next_version(selected)?.is_none() {
            return Err(UpgradeError::AlreadyNewest(selected.to_string()));
        }
        debug!("Initiating upgrade from {}", selected);

        match backend.initiate_upgrade(selected).await {
            Ok(response) => {
                info!("Upgrade started: {}", response.url_text);
                let notice = Notice::success(response.message);
                self.upgrades.insert(
                    0,
                    NoticeLink {
                        href: response.url,
                        text: response.url_text,
                    },
                );
                self.status.show(notice.clone(), Instant::now());
                Ok(notice)
            }
            Err(e) => {
                warn!("Upgrade from {} failed: {}", selected, e);
                self.status.show(Notice::warning(e.user_message()), Instant::now());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Call, MockBackend};
    use crate::api::UpgradeResponse;

    fn launcher() -> UpgradeLauncher {
        UpgradeLauncher::new(vec![
            "v16.0".to_string(),
            "v15.1".to_string(),
            "v15.0".to_string(),
            "latest".to_string(),
        ])
    }

    #[test]
    fn test_version_names() {
        assert!(is_version_name("v15.1"));
        assert!(is_version_name("v9.0"));
        assert!(!is_version_name("15.1"));
        assert!(!is_version_name("v15"));
        assert_eq!(launcher().versions().len(), 3);
    }

    #[test]
    fn test_hint_for_older_and_newest() {
        let launcher = launcher();
        assert_eq!(
            launcher.hint("v15.0").unwrap(),
            "You selected v15.0 and you want to upgrade to v15.1. Is this correct?"
        );
        assert_eq!(launcher.hint("v16.0").unwrap(), "You are already on the newest version.");
        assert!(matches!(launcher.hint("v1.0"), Err(UpgradeError::UnknownVersion(_))));
    }

    #[tokio::test]
    async fn test_initiate_prepends_upgrade_link() {
        let backend = MockBackend::new();
        backend.push_upgrade(Ok(UpgradeResponse {
            message: "Upgrade initiated.".to_string(),
            url: "/changes/v15.1/v16.0".to_string(),
            url_text: "v15.1 → v16.0".to_string(),
        }));
        let mut launcher = launcher();

        let notice = launcher.initiate(&backend, "v15.1").await.unwrap();

        assert_eq!(notice.text, "Upgrade initiated.");
        assert_eq!(launcher.upgrades()[0].href, "/changes/v15.1/v16.0");
        assert_eq!(backend.calls(), vec![Call::Upgrade("v15.1".to_string())]);
    }

    #[tokio::test]
    async fn test_initiate_error_uses_body_message() {
        let backend = MockBackend::new();
        backend.push_upgrade(Err(ApiError::Status {
            status: 400,
            message: "Upgrade already exists.".to_string(),
        }));
        let mut launcher = launcher();

        assert!(launcher.initiate(&backend, "v15.0").await.is_err());
        let status = launcher.status(Instant::now()).unwrap();
        assert!(status.is_error());
        assert_eq!(status.kind.alert_class(), "alert-warning");
        assert_eq!(status.text, "Upgrade already exists.");
        assert!(launcher.upgrades().is_empty());
    }

    #[tokio::test]
    async fn test_newest_version_is_not_sent() {
        let backend = MockBackend::new();
        let mut launcher = launcher();
        assert!(matches!(
            launcher.initiate(&backend, "v16.0").await,
            Err(UpgradeError::AlreadyNewest(_))
        ));
        assert!(backend.calls().is_empty());
    }
}
