//! Completion status changes and the status icon of each row.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::progress::ProgressTracker;
use super::OverviewError;
use crate::api::{Backend, StatusRequest};
use crate::models::{ChangeId, ChangeRow, CompletionStatus, VersionPair};
use crate::notice::{Notice, NoticeSlot};

/// The icon next to a change's status selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Check,
    Hourglass,
    Ban,
}

impl StatusIcon {
    pub fn for_status(status: CompletionStatus) -> Self {
        match status {
            CompletionStatus::Done => Self::Check,
            CompletionStatus::InProgress => Self::Hourglass,
            CompletionStatus::NotDone => Self::Ban,
        }
    }

    /// Icon and colour classes; exactly one set applies at a time.
    pub fn classes(&self) -> &'static str {
        match self {
            Self::Check => "bi-check text-success",
            Self::Hourglass => "bi-hourglass-split text-warning",
            Self::Ban => "bi-ban text-danger",
        }
    }

    pub fn element_id(id: &ChangeId) -> String {
        format!("icon-{}", id.dom_id())
    }
}

/// Owns the row collection and applies confirmed status changes to it.
#[derive(Debug, Clone)]
pub struct StatusTracker {
    pair: VersionPair,
    progress: ProgressTracker,
    notice: NoticeSlot,
}

impl StatusTracker {
    pub fn new(pair: VersionPair, rows: Vec<ChangeRow>) -> Self {
        Self {
            pair,
            progress: ProgressTracker::new(rows),
            notice: NoticeSlot::default(),
        }
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn icon(&self, id: &ChangeId) -> Option<StatusIcon> {
        self.progress.row(id).map(|row| StatusIcon::for_status(row.status))
    }

    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.visible(now)
    }

    /// Persist a new status; local state only changes once the backend accepted it.
    pub async fn change_status<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        id: &ChangeId,
        status: CompletionStatus,
    ) -> Result<StatusIcon, OverviewError> {
        let row = self
            .progress
            .row(id)
            .ok_or_else(|| OverviewError::UnknownChange(id.clone()))?;

        let request = StatusRequest {
            from_version: self.pair.from.clone(),
            to_version: self.pair.to.clone(),
            category: row.category.clone(),
            mitre_id: id.clone(),
            status,
        };
        debug!("Status {} -> {} ({})", id, status, self.pair);

        if let Err(e) = backend.update_status(&request).await {
            warn!("Status update for {} failed: {}", id, e);
            self.notice.show(Notice::from_api_error(&e), Instant::now());
            return Err(e.into());
        }

        self.notice.clear();
        self.progress.set_status(id, status);
        info!("{} is now {} ({})", id, status, self.progress.total_text());
        Ok(StatusIcon::for_status(status))
    }
}
