use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Session status reported by the egress API. Older SDK generations emit the
/// numeric protobuf value, newer ones the variant name, so deserialization
/// accepts both.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EgressStatus {
    Starting,
    Active,
    Ending,
    Complete,
    Failed,
    Aborted,
    LimitReached,
}

impl EgressStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, EgressStatus::Complete)
    }

    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            EgressStatus::Failed | EgressStatus::Aborted | EgressStatus::LimitReached
        )
    }

    fn from_numeric(value: u64) -> Option<Self> {
        match value {
            0 => Some(EgressStatus::Starting),
            1 => Some(EgressStatus::Active),
            2 => Some(EgressStatus::Complete),
            3 => Some(EgressStatus::Failed),
            4 => Some(EgressStatus::Aborted),
            5 => Some(EgressStatus::LimitReached),
            _ => None,
        }
    }

    fn from_name(value: &str) -> Option<Self> {
        match value {
            "EGRESS_STARTING" => Some(EgressStatus::Starting),
            "EGRESS_ACTIVE" => Some(EgressStatus::Active),
            "EGRESS_ENDING" => Some(EgressStatus::Ending),
            "EGRESS_COMPLETE" => Some(EgressStatus::Complete),
            "EGRESS_FAILED" => Some(EgressStatus::Failed),
            "EGRESS_ABORTED" => Some(EgressStatus::Aborted),
            "EGRESS_LIMIT_REACHED" => Some(EgressStatus::LimitReached),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for EgressStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        match &raw {
            Value::Number(number) => number
                .as_u64()
                .and_then(EgressStatus::from_numeric)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown egress status: {}", raw))),
            Value::String(name) => EgressStatus::from_name(name)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown egress status: {}", name))),
            _ => Err(serde::de::Error::custom("egress status must be a number or string")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EgressFileInfo {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EgressOutputInfo {
    #[serde(default)]
    pub file: Option<EgressFileInfo>,
}

/// One egress session record as returned by ListEgress and webhook payloads.
///
/// The file-location field moved around across SDK generations; every known
/// shape is kept here and resolved through [`EgressInfo::file_location`] so
/// call sites never probe raw JSON themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EgressInfo {
    pub egress_id: String,
    #[serde(default)]
    pub room_name: Option<String>,
    pub status: EgressStatus,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    file: Option<EgressFileInfo>,
    #[serde(default)]
    output: Option<EgressOutputInfo>,
    #[serde(default)]
    file_results: Option<Vec<EgressFileInfo>>,
    #[serde(default)]
    location: Option<String>,
}

impl EgressInfo {
    /// Resolves the produced file's location, trying one adapter per SDK
    /// generation, newest first.
    pub fn file_location(&self) -> Option<&str> {
        file_results_location(self)
            .or_else(|| legacy_file_location(self))
            .or_else(|| nested_output_location(self))
            .or_else(|| bare_location(self))
    }

    /// The user id the recording was started for, carried in the egress
    /// metadata as `{"userId": "..."}`.
    pub fn user_id_from_metadata(&self) -> Option<String> {
        let raw = self.metadata.as_deref()?;
        let value: Value = serde_json::from_str(raw).ok()?;
        value
            .get("userId")
            .and_then(Value::as_str)
            .map(|id| id.to_string())
    }
}

/// v1.x servers: results arrive as a `fileResults` array.
fn file_results_location(info: &EgressInfo) -> Option<&str> {
    info.file_results
        .as_ref()?
        .first()?
        .location
        .as_deref()
        .filter(|location| !location.is_empty())
}

/// Early SDKs: a single `file` object at the top level.
fn legacy_file_location(info: &EgressInfo) -> Option<&str> {
    info.file
        .as_ref()?
        .location
        .as_deref()
        .filter(|location| !location.is_empty())
}

/// Interim SDKs: the file nested under `output`.
fn nested_output_location(info: &EgressInfo) -> Option<&str> {
    info.output
        .as_ref()?
        .file
        .as_ref()?
        .location
        .as_deref()
        .filter(|location| !location.is_empty())
}

/// Oldest shape: a bare `location` string on the record itself.
fn bare_location(info: &EgressInfo) -> Option<&str> {
    info.location
        .as_deref()
        .filter(|location| !location.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EgressSession {
    pub egress_id: String,
}
