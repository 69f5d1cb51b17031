//! HTTP implementation of the backend contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use super::types::*;
use super::{ApiError, ApiResult, Backend};
use crate::config::{EndpointPaths, Settings};

/// reqwest-backed client for the tracker backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    endpoints: EndpointPaths,
}

impl BackendClient {
    /// Create a client from application settings.
    pub fn new(settings: &Settings) -> ApiResult<Self> {
        Self::with_options(
            &settings.base_url,
            settings.endpoints.clone(),
            Duration::from_secs(settings.request_timeout),
            &settings.user_agent,
        )
    }

    /// Create a client against an explicit base URL.
    pub fn with_options(
        base_url: &str,
        endpoints: EndpointPaths,
        timeout: Duration,
        user_agent: &str,
    ) -> ApiResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::Url(e.to_string()))?;
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            endpoints,
        })
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Url(format!("{}: {}", path, e)))
    }

    /// Send a request and turn non-2xx answers into [`ApiError::Status`].
    async fn send(&self, request: RequestBuilder, path: &str) -> ApiResult<Response> {
        debug!("POST {}", path);
        let resp = request.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", path, e);
            ApiError::from(e)
        })?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_default();

        warn!("{} answered HTTP {}: {}", path, status.as_u16(), message);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let url = self.endpoint(path)?;
        let resp = self.send(self.client.post(url).json(body), path).await?;
        decode_body(resp).await
    }
}

/// Pull `message` out of a JSON error body, falling back to short plain-text bodies.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(ErrorBody { message }) => message,
        Err(_) if !trimmed.starts_with('<') && trimmed.len() <= 200 => Some(trimmed.to_string()),
        Err(_) => None,
    }
}

/// Decode a JSON body; an empty body (e.g. 204) decodes to `T::default()`.
async fn decode_body<T: DeserializeOwned + Default>(resp: Response) -> ApiResult<T> {
    let bytes = resp.bytes().await.map_err(ApiError::from)?;
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(T::default());
    }
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
}

#[async_trait]
impl Backend for BackendClient {
    async fn update_classification(
        &self,
        request: &ClassificationRequest,
    ) -> ApiResult<ClassificationResponse> {
        let path = self.endpoints.classification.clone();
        let url = self.endpoint(&path)?;
        let resp = self.send(self.client.post(url).json(request), &path).await?;

        // Sums are mandatory here, an empty body is not a valid answer
        let bytes = resp.bytes().await.map_err(ApiError::from)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn fetch_links(&self, request: &LinksRequest) -> ApiResult<LinksResponse> {
        self.post_json(&self.endpoints.links, request).await
    }

    async fn update_evaluation_status(&self, request: &EvaluationStatusRequest) -> ApiResult<()> {
        let _: MessageResponse = self
            .post_json(&self.endpoints.evaluation_status, request)
            .await?;
        Ok(())
    }

    async fn update_annotation(&self, request: &AnnotationRequest) -> ApiResult<MessageResponse> {
        self.post_json(&self.endpoints.reasoning_and_measures, request)
            .await
    }

    async fn update_status(&self, request: &StatusRequest) -> ApiResult<MessageResponse> {
        self.post_json(&self.endpoints.status, request).await
    }

    async fn import_file(&self, request: &ImportRequest) -> ApiResult<MessageResponse> {
        let path = self.endpoints.file_upload.clone();
        let url = self.endpoint(&path)?;

        let mime = mime_guess::from_path(&request.file_name).first_or_octet_stream();
        let part = Part::bytes(request.content.clone())
            .file_name(request.file_name.clone())
            .mime_str(mime.essence_str())
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let form = Form::new()
            .part("file", part)
            .text("from_version", request.pair.from.clone())
            .text("to_version", request.pair.to.clone());

        let resp = self.send(self.client.post(url).multipart(form), &path).await?;
        decode_body(resp).await
    }

    async fn export_file(&self, request: &ExportRequest) -> ApiResult<ExportResponse> {
        self.post_json(&self.endpoints.file_export, request).await
    }

    async fn initiate_upgrade(&self, version_select: &str) -> ApiResult<UpgradeResponse> {
        let path = self.endpoints.upgrade_initiate.clone();
        let url = self.endpoint(&path)?;
        let resp = self
            .send(
                self.client
                    .post(url)
                    .form(&[("version_select", version_select)]),
                &path,
            )
            .await?;
        decode_body(resp).await
    }
}
