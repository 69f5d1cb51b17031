//! Classification editor: criticality values and C/I/A toggles.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::panels::DimensionPanels;
use super::{ChangeContext, DetailError};
use crate::api::{Backend, ClassificationRequest};
use crate::models::{ClassificationTarget, CriticalitySums, NOT_APPLICABLE};
use crate::notice::{Notice, NoticeSlot};

/// Displayed sums plus the panels they gate.
#[derive(Debug, Clone)]
pub struct ClassificationEditor {
    sums: CriticalitySums,
    panels: DimensionPanels,
    notice: NoticeSlot,
}

impl ClassificationEditor {
    pub fn new(sums: CriticalitySums, panels: DimensionPanels) -> Self {
        Self {
            sums,
            panels,
            notice: NoticeSlot::default(),
        }
    }

    pub fn sums(&self) -> CriticalitySums {
        self.sums
    }

    pub fn panels(&self) -> &DimensionPanels {
        &self.panels
    }

    pub fn panels_mut(&mut self) -> &mut DimensionPanels {
        &mut self.panels
    }

    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.visible(now)
    }

    /// Evaluation status sent along with a classification change.
    fn outgoing_eval_status(&self, target: ClassificationTarget, value: i64) -> Option<String> {
        let dimension = target.dimension()?;
        if value == 0 {
            Some(NOT_APPLICABLE.to_string())
        } else {
            Some(self.panels.get(dimension).cached_status().to_string())
        }
    }

    /// Send a changed control to the server and apply the returned sums.
    pub async fn change<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        context: &ChangeContext,
        target: ClassificationTarget,
        value: i64,
    ) -> Result<CriticalitySums, DetailError> {
        let request = ClassificationRequest {
            change: context.change_ref(),
            target: target.control_id(),
            value,
            eval_status: self.outgoing_eval_status(target, value),
        };
        debug!("Classification {} = {} for {}", request.target, value, context.id);

        match backend.update_classification(&request).await {
            Ok(response) => {
                self.notice.clear();
                let sums = response.sums();
                self.apply_sums(sums);
                Ok(sums)
            }
            Err(e) => {
                warn!("Classification update for {} failed: {}", context.id, e);
                self.notice.show(Notice::from_api_error(&e), Instant::now());
                Err(e.into())
            }
        }
    }

    /// Replace the displayed sums and cascade enablement.
    pub fn apply_sums(&mut self, sums: CriticalitySums) {
        self.sums = sums;
        for dimension in self.panels.apply_sums(sums) {
            let panel = self.panels.get(dimension);
            info!(
                "{} evaluation {} (sum {})",
                dimension,
                if panel.is_enabled() { "enabled" } else { "disabled" },
                sums.get(dimension)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Call, MockBackend};
    use crate::api::ApiError;
    use crate::models::{ChangeId, Dimension, VersionPair};

    fn context() -> ChangeContext {
        ChangeContext::new(VersionPair::new("v15.1", "v16.0"), ChangeId::new("T1059.001"))
    }

    fn editor() -> ClassificationEditor {
        let sums = CriticalitySums {
            client: 2,
            infra: 1,
            service: 1,
        };
        ClassificationEditor::new(
            sums,
            DimensionPanels::new(["evaluated", "not evaluated", "partially evaluated"], sums),
        )
    }

    #[tokio::test]
    async fn test_sums_replace_displayed_values() {
        let backend = MockBackend::new();
        backend.push_sums(5, 1, 1);
        let mut editor = editor();

        let sums = editor
            .change(&backend, &context(), ClassificationTarget::Criticality(Dimension::Client), 4)
            .await
            .unwrap();

        assert_eq!(sums.client, 5);
        assert_eq!(editor.sums(), sums);
        match &backend.calls()[0] {
            Call::Classification(req) => {
                assert_eq!(req.target, "client-criticality");
                assert_eq!(req.eval_status.as_deref(), Some("evaluated"));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_cascade_and_restore() {
        let backend = MockBackend::new();
        backend.push_sums(0, 1, 1);
        backend.push_sums(3, 1, 1);
        let mut editor = editor();
        let target = ClassificationTarget::Criticality(Dimension::Client);

        editor.change(&backend, &context(), target, 0).await.unwrap();
        let panel = editor.panels().get(Dimension::Client);
        assert!(!panel.is_enabled());
        assert_eq!(panel.evaluation_status(), "n.a.");

        editor.change(&backend, &context(), target, 3).await.unwrap();
        let panel = editor.panels().get(Dimension::Client);
        assert!(panel.is_enabled());
        assert_eq!(panel.evaluation_status(), "evaluated");

        let calls = backend.calls();
        match (&calls[0], &calls[1]) {
            (Call::Classification(first), Call::Classification(second)) => {
                assert_eq!(first.eval_status.as_deref(), Some("n.a."));
                assert_eq!(second.eval_status.as_deref(), Some("evaluated"));
            }
            other => panic!("unexpected calls {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_toggle_sends_no_eval_status_and_cascades() {
        let backend = MockBackend::new();
        // Unchecking integrity drops every sum to zero
        backend.push_sums(0, 0, 0);
        let mut editor = editor();

        editor
            .change(&backend, &context(), ClassificationTarget::Integrity, 0)
            .await
            .unwrap();

        assert!(editor.panels().iter().all(|p| !p.is_enabled()));
        match &backend.calls()[0] {
            Call::Classification(req) => assert_eq!(req.eval_status, None),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_sums_and_shows_error() {
        let backend = MockBackend::new();
        backend.fail_with(ApiError::Timeout);
        let mut editor = editor();
        let before = editor.sums();

        let err = editor
            .change(&backend, &context(), ClassificationTarget::Availability, 1)
            .await
            .unwrap_err();

        assert!(matches!(err, DetailError::Api(ApiError::Timeout)));
        assert_eq!(editor.sums(), before);
        assert!(editor.notice(Instant::now()).unwrap().is_error());
    }
}
