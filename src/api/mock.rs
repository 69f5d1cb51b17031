//! Recording test double for [`Backend`].

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::*;
use super::{ApiError, ApiResult, Backend};

/// A call the component under test made.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Classification(ClassificationRequest),
    Links(LinksRequest),
    EvaluationStatus(EvaluationStatusRequest),
    Annotation(AnnotationRequest),
    Status(StatusRequest),
    Import(ImportRequest),
    Export(ExportRequest),
    Upgrade(String),
}

/// Canned answers are consumed in order; a missing answer means "succeed with defaults".
#[derive(Default)]
pub struct MockBackend {
    calls: Mutex<Vec<Call>>,
    sums: Mutex<VecDeque<ApiResult<ClassificationResponse>>>,
    links: Mutex<VecDeque<ApiResult<LinksResponse>>>,
    messages: Mutex<VecDeque<ApiResult<MessageResponse>>>,
    exports: Mutex<VecDeque<ApiResult<ExportResponse>>>,
    upgrades: Mutex<VecDeque<ApiResult<UpgradeResponse>>>,
    failure: Mutex<Option<ApiError>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_sums(&self, client: i64, infra: i64, service: i64) {
        self.sums.lock().unwrap().push_back(Ok(ClassificationResponse {
            message: Some("Updated database".to_string()),
            client_criticality_sum: client,
            infra_criticality_sum: infra,
            service_criticality_sum: service,
        }));
    }

    pub fn push_links(&self, prev: Option<&str>, next: Option<&str>) {
        self.links.lock().unwrap().push_back(Ok(LinksResponse {
            prev_url: prev.map(str::to_string),
            next_url: next.map(str::to_string),
        }));
    }

    pub fn push_message(&self, result: ApiResult<&str>) {
        self.messages.lock().unwrap().push_back(result.map(|m| MessageResponse {
            message: Some(m.to_string()),
        }));
    }

    pub fn push_export(&self, result: ApiResult<ExportResponse>) {
        self.exports.lock().unwrap().push_back(result);
    }

    pub fn push_upgrade(&self, result: ApiResult<UpgradeResponse>) {
        self.upgrades.lock().unwrap().push_back(result);
    }

    /// Make every following call fail with `err`.
    pub fn fail_with(&self, err: ApiError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    fn record(&self, call: Call) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next<T: Default>(queue: &Mutex<VecDeque<ApiResult<T>>>) -> ApiResult<T> {
        queue.lock().unwrap().pop_front().unwrap_or_else(|| Ok(T::default()))
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn update_classification(
        &self,
        request: &ClassificationRequest,
    ) -> ApiResult<ClassificationResponse> {
        self.record(Call::Classification(request.clone()))?;
        Self::next(&self.sums)
    }

    async fn fetch_links(&self, request: &LinksRequest) -> ApiResult<LinksResponse> {
        self.record(Call::Links(request.clone()))?;
        Self::next(&self.links)
    }

    async fn update_evaluation_status(&self, request: &EvaluationStatusRequest) -> ApiResult<()> {
        self.record(Call::EvaluationStatus(request.clone()))
    }

    async fn update_annotation(&self, request: &AnnotationRequest) -> ApiResult<MessageResponse> {
        self.record(Call::Annotation(request.clone()))?;
        Self::next(&self.messages)
    }

    async fn update_status(&self, request: &StatusRequest) -> ApiResult<MessageResponse> {
        self.record(Call::Status(request.clone()))?;
        Self::next(&self.messages)
    }

    async fn import_file(&self, request: &ImportRequest) -> ApiResult<MessageResponse> {
        self.record(Call::Import(request.clone()))?;
        Self::next(&self.messages)
    }

    async fn export_file(&self, request: &ExportRequest) -> ApiResult<ExportResponse> {
        self.record(Call::Export(request.clone()))?;
        Self::next(&self.exports)
    }

    async fn initiate_upgrade(&self, version_select: &str) -> ApiResult<UpgradeResponse> {
        self.record(Call::Upgrade(version_select.to_string()))?;
        Self::next(&self.upgrades)
    }
}
