//! User-facing status messages.

use std::time::{Duration, Instant};

use crate::api::ApiError;

/// How long a reasoning/measures confirmation stays visible.
pub const CONFIRMATION_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    /// A rejected request the user can correct, e.g. an upgrade that already exists.
    Warning,
}

impl NoticeKind {
    /// Class of the inline message span next to a submit button.
    pub fn message_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error | Self::Warning => "error",
        }
    }

    /// Class of the page-level alert box.
    pub fn alert_class(&self) -> &'static str {
        match self {
            Self::Success => "alert-primary",
            Self::Error => "alert-danger",
            Self::Warning => "alert-warning",
        }
    }
}

/// A link rendered after the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeLink {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub link: Option<NoticeLink>,
    /// `None` keeps the notice until it is replaced.
    pub ttl: Option<Duration>,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
            link: None,
            ttl: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
            link: None,
            ttl: None,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
            link: None,
            ttl: None,
        }
    }

    /// Error notice for a failed backend call.
    pub fn from_api_error(err: &ApiError) -> Self {
        Self::error(err.user_message())
    }

    pub fn with_link(mut self, href: impl Into<String>, text: impl Into<String>) -> Self {
        self.link = Some(NoticeLink {
            href: href.into(),
            text: text.into(),
        });
        self
    }

    pub fn expiring_after(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Errors and warnings both mean the request did not go through.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, NoticeKind::Error | NoticeKind::Warning)
    }
}

/// The single message area of a control; a new notice replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct NoticeSlot {
    current: Option<(Notice, Instant)>,
}

impl NoticeSlot {
    pub fn show(&mut self, notice: Notice, now: Instant) {
        self.current = Some((notice, now));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The notice visible at `now`, if it has not expired.
    pub fn visible(&self, now: Instant) -> Option<&Notice> {
        let (notice, shown_at) = self.current.as_ref()?;
        match notice.ttl {
            Some(ttl) if now.saturating_duration_since(*shown_at) >= ttl => None,
            _ => Some(notice),
        }
    }
}
