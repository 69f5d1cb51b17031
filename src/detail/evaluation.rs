//! Evaluation status and reasoning/measures submissions.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, warn};

use super::panels::DimensionPanels;
use super::{ChangeContext, DetailError};
use crate::api::{AnnotationRequest, Backend, EvaluationStatusRequest};
use crate::models::{AnnotationKind, Dimension};
use crate::notice::{Notice, NoticeSlot, CONFIRMATION_TTL};

/// Message areas next to each status selector and submit button, keyed by control id.
#[derive(Debug, Clone, Default)]
pub struct EvaluationEditor {
    notices: HashMap<String, NoticeSlot>,
}

impl EvaluationEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notice shown next to `control_id` at `now`.
    pub fn notice(&self, control_id: &str, now: Instant) -> Option<&Notice> {
        self.notices.get(control_id)?.visible(now)
    }

    fn show(&mut self, control_id: String, notice: Notice, now: Instant) {
        self.notices.entry(control_id).or_default().show(notice, now);
    }

    /// The user picked a new evaluation status for `dimension`.
    pub async fn set_status<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        context: &ChangeContext,
        panels: &mut DimensionPanels,
        dimension: Dimension,
        value: &str,
        now: Instant,
    ) -> Result<(), DetailError> {
        if !panels.get(dimension).is_enabled() {
            return Err(DetailError::Disabled(dimension));
        }

        let request = EvaluationStatusRequest {
            change: context.change_ref(),
            target: dimension.status_control(),
            value: value.to_string(),
        };
        debug!("Evaluation status {} = {} for {}", request.target, value, context.id);

        if let Err(e) = backend.update_evaluation_status(&request).await {
            warn!("Evaluation status update for {} failed: {}", context.id, e);
            self.show(request.target, Notice::from_api_error(&e), now);
            return Err(e.into());
        }

        // Only a saved status becomes the cached one sent with later classification changes
        panels.get_mut(dimension).select_status(value);
        self.notices.remove(&request.target);
        Ok(())
    }

    /// Submit reasoning or measures text; the confirmation disappears after two seconds.
    #[allow(clippy::too_many_arguments)]
    pub async fn submit<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        context: &ChangeContext,
        panels: &DimensionPanels,
        dimension: Dimension,
        kind: AnnotationKind,
        text: &str,
        now: Instant,
    ) -> Result<Notice, DetailError> {
        if !panels.get(dimension).is_enabled() {
            return Err(DetailError::Disabled(dimension));
        }

        let request = AnnotationRequest {
            change: context.change_ref(),
            target: kind.control_id(dimension),
            text: text.to_string(),
        };
        debug!("Submitting {} for {} ({} chars)", request.target, context.id, text.len());

        let button = format!("{}-btn", request.target);
        match backend.update_annotation(&request).await {
            Ok(response) => {
                let notice = Notice::success(response.message.unwrap_or_default())
                    .expiring_after(CONFIRMATION_TTL);
                self.show(button, notice.clone(), now);
                Ok(notice)
            }
            Err(e) => {
                warn!("Saving {} for {} failed: {}", request.target, context.id, e);
                self.show(button, Notice::from_api_error(&e), now);
                Err(e.into())
            }
        }
    }
}
