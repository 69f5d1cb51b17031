//! Request and response bodies exchanged with the tracker backend.

use serde::{Deserialize, Serialize};

use crate::models::{ChangeId, CompletionStatus, CriticalitySums, VersionPair};

/// Identity of a change as every change-scoped request carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRef {
    pub from_version: String,
    pub to_version: String,
    pub mitre_id: ChangeId,
}

impl ChangeRef {
    pub fn new(pair: &VersionPair, mitre_id: &ChangeId) -> Self {
        Self {
            from_version: pair.from.clone(),
            to_version: pair.to.clone(),
            mitre_id: mitre_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    #[serde(flatten)]
    pub change: ChangeRef,
    /// Control id, e.g. `client-criticality` or `integrity`.
    pub target: String,
    pub value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub client_criticality_sum: i64,
    pub infra_criticality_sum: i64,
    pub service_criticality_sum: i64,
}

impl ClassificationResponse {
    pub fn sums(&self) -> CriticalitySums {
        CriticalitySums {
            client: self.client_criticality_sum,
            infra: self.infra_criticality_sum,
            service: self.service_criticality_sum,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinksRequest {
    #[serde(flatten)]
    pub change: ChangeRef,
    /// Active filter label (`All`, `Done`, ...).
    pub filter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinksResponse {
    #[serde(default)]
    pub prev_url: Option<String>,
    #[serde(default)]
    pub next_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStatusRequest {
    #[serde(flatten)]
    pub change: ChangeRef,
    /// Selector id, e.g. `infra-status`.
    pub target: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRequest {
    #[serde(flatten)]
    pub change: ChangeRef,
    /// Textarea name, e.g. `client-reasoning`.
    pub target: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRequest {
    pub from_version: String,
    pub to_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub mitre_id: ChangeId,
    pub status: CompletionStatus,
}

/// Generic `{ "message": ... }` body; the status endpoint may answer 204 with no body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Spreadsheet upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRequest {
    pub pair: VersionPair,
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub from_version: String,
    pub to_version: String,
}

impl From<&VersionPair> for ExportRequest {
    fn from(pair: &VersionPair) -> Self {
        Self {
            from_version: pair.from.clone(),
            to_version: pair.to.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportResponse {
    pub message: String,
    pub download_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeResponse {
    pub message: String,
    pub url: String,
    pub url_text: String,
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
