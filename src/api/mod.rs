//! Backend contract.
//!
//! Every component reaches the server through [`Backend`], so page logic can
//! run against the HTTP client or a test double.

mod client;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;

pub use client::BackendClient;
pub use types::*;

use async_trait::async_trait;

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Could not reach the backend.
    #[error("Connection error: {0}")]
    Connection(String),
    /// No response within the client timeout.
    #[error("Request timed out")]
    Timeout,
    /// Non-2xx response; `message` comes from the error body when present.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
    /// Endpoint path could not be joined onto the base URL.
    #[error("Invalid endpoint URL: {0}")]
    Url(String),
}

impl ApiError {
    /// Text suitable for an error notice.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Status { status, .. } => format!("Request failed (HTTP {})", status),
            ApiError::Timeout => "The server did not respond in time".to_string(),
            ApiError::Connection(_) => "Could not reach the server".to_string(),
            ApiError::Parse(_) => "The server sent an unexpected response".to_string(),
            ApiError::Url(msg) => format!("Invalid endpoint: {}", msg),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Parse(e.to_string())
        } else {
            ApiError::Connection(e.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Request/response calls the page components make.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Change a classification control; returns the recomputed sums.
    async fn update_classification(
        &self,
        request: &ClassificationRequest,
    ) -> ApiResult<ClassificationResponse>;

    /// Look up prev/next links under the active filter.
    async fn fetch_links(&self, request: &LinksRequest) -> ApiResult<LinksResponse>;

    /// Persist a dimension's evaluation status.
    async fn update_evaluation_status(&self, request: &EvaluationStatusRequest) -> ApiResult<()>;

    /// Persist reasoning or measures text.
    async fn update_annotation(&self, request: &AnnotationRequest) -> ApiResult<MessageResponse>;

    /// Persist a change's completion status.
    async fn update_status(&self, request: &StatusRequest) -> ApiResult<MessageResponse>;

    /// Upload a spreadsheet to import progress from.
    async fn import_file(&self, request: &ImportRequest) -> ApiResult<MessageResponse>;

    /// Ask the server to generate an export.
    async fn export_file(&self, request: &ExportRequest) -> ApiResult<ExportResponse>;

    /// Start tracking the upgrade from the selected version to its successor.
    async fn initiate_upgrade(&self, version_select: &str) -> ApiResult<UpgradeResponse>;
}
