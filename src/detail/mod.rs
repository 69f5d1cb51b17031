//! Change detail page: description diff, classification, evaluation and
//! prev/next navigation for a single change.

mod assessment;
mod classification;
mod evaluation;
mod panels;

pub use assessment::AssessmentPanel;
pub use classification::ClassificationEditor;
pub use evaluation::EvaluationEditor;
pub use panels::{ControlState, DimensionPanel, DimensionPanels};

use std::time::Instant;

use tracing::info;

use crate::api::{ApiError, Backend, ChangeRef};
use crate::diff::{DiffView, DiffViewer};
use crate::models::{
    AnnotationKind, ChangeId, ClassificationTarget, CriticalitySums, Dimension, StatusFilter,
    VersionPair,
};
use crate::navigation::{NavigationLinks, ScrollStateManager};
use crate::notice::Notice;
use crate::overview::stored_filter;
use crate::store::{KeyValueStore, StoreError};

/// Failure of a detail page action.
#[derive(Debug, thiserror::Error)]
pub enum DetailError {
    #[error("{0} evaluation is disabled while its criticality sum is 0")]
    Disabled(Dimension),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Which change of which upgrade a page is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeContext {
    pub pair: VersionPair,
    pub id: ChangeId,
}

impl ChangeContext {
    pub fn new(pair: VersionPair, id: ChangeId) -> Self {
        Self { pair, id }
    }

    pub fn change_ref(&self) -> ChangeRef {
        ChangeRef::new(&self.pair, &self.id)
    }
}

/// Server-rendered state the detail page starts from.
#[derive(Debug, Clone, Default)]
pub struct DetailSnapshot {
    pub old_description: String,
    pub new_description: String,
    pub sums: CriticalitySums,
    /// Evaluation status per dimension, in client/infra/service order.
    pub statuses: [String; 3],
    /// Category the links lookup is scoped to, if any.
    pub category: Option<String>,
}

pub struct ChangeDetailPage {
    context: ChangeContext,
    category: Option<String>,
    filter: StatusFilter,
    diff: DiffViewer,
    classification: ClassificationEditor,
    evaluation: EvaluationEditor,
    assessment: AssessmentPanel,
    links: NavigationLinks,
}

impl ChangeDetailPage {
    /// Page load: mark this change for highlighting and restore persisted UI state.
    pub fn load(
        store: &dyn KeyValueStore,
        context: ChangeContext,
        snapshot: DetailSnapshot,
    ) -> Result<Self, DetailError> {
        ScrollStateManager::new(store).on_detail_load(&context.id)?;
        let filter = stored_filter(store, &context.pair)?;
        let assessment = AssessmentPanel::load(store)?;

        let statuses = [
            snapshot.statuses[0].as_str(),
            snapshot.statuses[1].as_str(),
            snapshot.statuses[2].as_str(),
        ];
        let panels = DimensionPanels::new(statuses, snapshot.sums);
        info!("Loaded {} ({}) with filter {}", context.id, context.pair, filter);

        Ok(Self {
            context,
            category: snapshot.category,
            filter,
            diff: DiffViewer::new(snapshot.old_description, snapshot.new_description),
            classification: ClassificationEditor::new(snapshot.sums, panels),
            evaluation: EvaluationEditor::new(),
            assessment,
            links: NavigationLinks::default(),
        })
    }

    pub fn context(&self) -> &ChangeContext {
        &self.context
    }

    /// `Filter: <label>` shown above the navigation buttons.
    pub fn filter_label(&self) -> String {
        format!("Filter: {}", self.filter)
    }

    pub fn toggle_diff(&mut self) -> DiffView<'_> {
        self.diff.toggle()
    }

    pub fn diff(&self) -> &DiffViewer {
        &self.diff
    }

    pub fn classification(&self) -> &ClassificationEditor {
        &self.classification
    }

    pub fn panels(&self) -> &DimensionPanels {
        self.classification.panels()
    }

    pub fn links(&self) -> &NavigationLinks {
        &self.links
    }

    pub fn assessment(&self) -> AssessmentPanel {
        self.assessment
    }

    pub fn toggle_assessment(&mut self, store: &dyn KeyValueStore) -> Result<bool, DetailError> {
        Ok(self.assessment.toggle(store)?)
    }

    /// Look up prev/next under the filter the page was loaded with.
    pub async fn refresh_links<B: Backend + ?Sized>(&mut self, backend: &B) -> Result<(), DetailError> {
        self.links = NavigationLinks::fetch(backend, &self.context, self.filter, self.category.as_deref()).await?;
        Ok(())
    }

    pub async fn change_classification<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        target: ClassificationTarget,
        value: i64,
    ) -> Result<CriticalitySums, DetailError> {
        self.classification.change(backend, &self.context, target, value).await
    }

    pub async fn set_evaluation_status<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        dimension: Dimension,
        value: &str,
    ) -> Result<(), DetailError> {
        self.evaluation
            .set_status(
                backend,
                &self.context,
                self.classification.panels_mut(),
                dimension,
                value,
                Instant::now(),
            )
            .await
    }

    pub async fn submit_annotation<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        dimension: Dimension,
        kind: AnnotationKind,
        text: &str,
    ) -> Result<Notice, DetailError> {
        self.evaluation
            .submit(
                backend,
                &self.context,
                self.classification.panels(),
                dimension,
                kind,
                text,
                Instant::now(),
            )
            .await
    }

    pub fn evaluation(&self) -> &EvaluationEditor {
        &self.evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Call, MockBackend};
    use crate::diff::DiffView;
    use crate::store::{keys, MemoryStore};

    fn context() -> ChangeContext {
        ChangeContext::new(VersionPair::new("v15.1", "v16.0"), ChangeId::new("T1059.001"))
    }

    fn snapshot() -> DetailSnapshot {
        DetailSnapshot {
            old_description: "<p>Adversaries may abuse cmd.</p>".to_string(),
            new_description: "<p>Adversaries may abuse PowerShell.</p>".to_string(),
            sums: CriticalitySums {
                client: 1,
                infra: 0,
                service: 2,
            },
            statuses: [
                "evaluated".to_string(),
                "n.a.".to_string(),
                "not evaluated".to_string(),
            ],
            category: Some("techniques".to_string()),
        }
    }

    #[test]
    fn test_load_marks_highlight_and_reads_filter() {
        let store = MemoryStore::new();
        store.set(&keys::filter(&context().pair), "In Progress").unwrap();

        let page = ChangeDetailPage::load(&store, context(), snapshot()).unwrap();

        assert_eq!(store.get(keys::HIGHLIGHT_ID).unwrap().as_deref(), Some("T1059.001"));
        assert_eq!(page.filter_label(), "Filter: In Progress");
        assert!(!page.panels().get(Dimension::Infra).is_enabled());
        assert!(!page.assessment().is_expanded());
    }

    #[test]
    fn test_filter_label_defaults_to_all() {
        let store = MemoryStore::new();
        let page = ChangeDetailPage::load(&store, context(), snapshot()).unwrap();
        assert_eq!(page.filter_label(), "Filter: All");
    }

    #[test]
    fn test_diff_toggle_through_page() {
        let store = MemoryStore::new();
        let mut page = ChangeDetailPage::load(&store, context(), snapshot()).unwrap();
        match page.toggle_diff() {
            DiffView::Annotated { diff, .. } => {
                assert!(diff.to_html().contains(r#"<span class="added">PowerShell</span>"#))
            }
            other => panic!("expected annotated view, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_links_use_stored_filter_and_category() {
        let store = MemoryStore::new();
        store.set(&keys::filter(&context().pair), "Done").unwrap();
        let backend = MockBackend::new();
        backend.push_links(None, Some("/change/v15.1/v16.0/T1059.003"));
        let mut page = ChangeDetailPage::load(&store, context(), snapshot()).unwrap();

        page.refresh_links(&backend).await.unwrap();

        assert!(!page.links().prev.is_enabled());
        assert_eq!(page.links().next.href(), Some("/change/v15.1/v16.0/T1059.003"));
        match &backend.calls()[0] {
            Call::Links(req) => {
                assert_eq!(req.filter, "Done");
                assert_eq!(req.category.as_deref(), Some("techniques"));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reenabled_dimension_accepts_evaluation() {
        let store = MemoryStore::new();
        let backend = MockBackend::new();
        backend.push_sums(1, 3, 2);
        let mut page = ChangeDetailPage::load(&store, context(), snapshot()).unwrap();

        assert!(matches!(
            page.set_evaluation_status(&backend, Dimension::Infra, "evaluated").await,
            Err(DetailError::Disabled(Dimension::Infra))
        ));

        page.change_classification(&backend, ClassificationTarget::Criticality(Dimension::Infra), 3)
            .await
            .unwrap();
        page.set_evaluation_status(&backend, Dimension::Infra, "evaluated")
            .await
            .unwrap();
        assert_eq!(page.panels().get(Dimension::Infra).evaluation_status(), "evaluated");
    }
}
