//! Domain types shared by every page component.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Evaluation status shown when a dimension carries no criticality.
pub const NOT_APPLICABLE: &str = "n.a.";

/// The (from, to) ATT&CK versions an upgrade is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionPair {
    pub from: String,
    pub to: String,
}

impl VersionPair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for VersionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// ATT&CK element identifier of a change, e.g. `T1059.001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl ChangeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier usable as an element id (dots are invalid there).
    pub fn dom_id(&self) -> String {
        self.0.replace('.', "-")
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChangeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Completion status of a single change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionStatus {
    #[serde(rename = "Done")]
    Done,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Not Done")]
    NotDone,
}

impl CompletionStatus {
    pub const ALL: [CompletionStatus; 3] = [Self::Done, Self::InProgress, Self::NotDone];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::InProgress => "In Progress",
            Self::NotDone => "Not Done",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompletionStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseLabelError::new("completion status", s))
    }
}

/// One of the three criticality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Client,
    Infra,
    Service,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Self::Client, Self::Infra, Self::Service];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Infra => "infra",
            Self::Service => "service",
        }
    }

    /// Id of the evaluation-status selector, also its `target` on the wire.
    pub fn status_control(&self) -> String {
        format!("{}-status", self.as_str())
    }

    pub fn reasoning_control(&self) -> String {
        format!("{}-reasoning", self.as_str())
    }

    pub fn measures_control(&self) -> String {
        format!("{}-measures", self.as_str())
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == prefix)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_prefix(s).ok_or_else(|| ParseLabelError::new("dimension", s))
    }
}

/// A classification control whose change is sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationTarget {
    /// Integer criticality of one dimension.
    Criticality(Dimension),
    Confidentiality,
    Integrity,
    Availability,
}

impl ClassificationTarget {
    /// Control id, sent as `target`.
    pub fn control_id(&self) -> String {
        match self {
            Self::Criticality(dim) => format!("{}-criticality", dim.as_str()),
            Self::Confidentiality => "confidentiality".to_string(),
            Self::Integrity => "integrity".to_string(),
            Self::Availability => "availability".to_string(),
        }
    }

    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Self::Criticality(dim) => Some(*dim),
            _ => None,
        }
    }
}

impl fmt::Display for ClassificationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.control_id())
    }
}

impl FromStr for ClassificationTarget {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confidentiality" => Ok(Self::Confidentiality),
            "integrity" => Ok(Self::Integrity),
            "availability" => Ok(Self::Availability),
            other => other
                .strip_suffix("-criticality")
                .and_then(Dimension::from_prefix)
                .map(Self::Criticality)
                .ok_or_else(|| ParseLabelError::new("classification target", s)),
        }
    }
}

/// Which free-text field of a dimension is being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Reasoning,
    Measures,
}

impl AnnotationKind {
    pub fn control_id(&self, dimension: Dimension) -> String {
        match self {
            Self::Reasoning => dimension.reasoning_control(),
            Self::Measures => dimension.measures_control(),
        }
    }
}

impl FromStr for AnnotationKind {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reasoning" => Ok(Self::Reasoning),
            "measures" => Ok(Self::Measures),
            _ => Err(ParseLabelError::new("annotation kind", s)),
        }
    }
}

/// Aggregate criticality per dimension, as last reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalitySums {
    pub client: i64,
    pub infra: i64,
    pub service: i64,
}

impl CriticalitySums {
    pub fn get(&self, dimension: Dimension) -> i64 {
        match dimension {
            Dimension::Client => self.client,
            Dimension::Infra => self.infra,
            Dimension::Service => self.service,
        }
    }
}

/// Status filter shown above the changes overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CompletionStatus),
}

impl StatusFilter {
    /// Options in the order the radio buttons appear.
    pub const OPTIONS: [StatusFilter; 4] = [
        Self::All,
        Self::Only(CompletionStatus::Done),
        Self::Only(CompletionStatus::InProgress),
        Self::Only(CompletionStatus::NotDone),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(status) => status.as_str(),
        }
    }

    pub fn matches(&self, status: CompletionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            return Ok(Self::All);
        }
        s.parse::<CompletionStatus>()
            .map(Self::Only)
            .map_err(|_| ParseLabelError::new("filter", s))
    }
}

/// One row of the changes overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRow {
    pub id: ChangeId,
    /// Changelog category (e.g. `major_version_changes`), used for per-category progress.
    pub change_category: String,
    /// Optional `category` sent along with status updates.
    pub category: Option<String>,
    pub status: CompletionStatus,
}

impl ChangeRow {
    pub fn new(id: impl Into<ChangeId>, change_category: &str, status: CompletionStatus) -> Self {
        Self {
            id: id.into(),
            change_category: change_category.to_string(),
            category: None,
            status,
        }
    }
}

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ParseLabelError::new("theme", s)),
        }
    }
}

/// A label that does not belong to the expected vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value:?}")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_id_dom_id() {
        assert_eq!(ChangeId::new("T1059.001").dom_id(), "T1059-001");
        assert_eq!(ChangeId::new("T1003").dom_id(), "T1003");
    }

    #[test]
    fn test_classification_target_parse() {
        assert_eq!(
            "infra-criticality".parse::<ClassificationTarget>().unwrap(),
            ClassificationTarget::Criticality(Dimension::Infra)
        );
        assert_eq!(
            "integrity".parse::<ClassificationTarget>().unwrap(),
            ClassificationTarget::Integrity
        );
        assert!("network-criticality".parse::<ClassificationTarget>().is_err());
        assert_eq!(
            ClassificationTarget::Criticality(Dimension::Service).control_id(),
            "service-criticality"
        );
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&CompletionStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        assert_eq!(
            "Not Done".parse::<CompletionStatus>().unwrap(),
            CompletionStatus::NotDone
        );
    }

    #[test]
    fn test_filter_labels() {
        for option in StatusFilter::OPTIONS {
            assert_eq!(option.label().parse::<StatusFilter>().unwrap(), option);
        }
        assert!(StatusFilter::All.matches(CompletionStatus::NotDone));
        assert!(!StatusFilter::Only(CompletionStatus::Done).matches(CompletionStatus::NotDone));
    }
}
