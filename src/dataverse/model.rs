use super::version::VersionNumber;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const VAULT_METADATA_BLOCK: &str = "dansDataVaultMetadata";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionState {
    Draft,
    Released,
    Deaccessioned,
    #[default]
    #[serde(other)]
    Other,
}

/// Read projection of a dataset version as returned by the Dataverse
/// native API. Drafts carry no version numbers.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetVersion {
    #[serde(default)]
    pub version_number: Option<u32>,
    #[serde(default)]
    pub version_minor_number: Option<u32>,
    #[serde(default)]
    pub version_state: VersionState,
    #[serde(default)]
    pub metadata_blocks: BTreeMap<String, MetadataBlock>,
}

impl DatasetVersion {
    pub fn version(&self) -> VersionNumber {
        VersionNumber::new(
            self.version_number.unwrap_or(0),
            self.version_minor_number.unwrap_or(0),
        )
    }

    /// Single value of a vault metadata field; blank values count as absent.
    pub fn vault_field(&self, type_name: &str) -> Option<&str> {
        self.metadata_blocks
            .get(VAULT_METADATA_BLOCK)?
            .fields
            .iter()
            .find(|field| field.type_name == type_name)?
            .primitive_value()
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<MetadataField>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataField {
    pub type_name: String,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub type_class: String,
    #[serde(default)]
    pub value: Value,
}

impl MetadataField {
    pub fn primitive(type_name: &str, value: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            multiple: false,
            type_class: "primitive".to_string(),
            value: Value::String(value.to_string()),
        }
    }

    pub fn primitive_value(&self) -> Option<&str> {
        if self.multiple {
            return None;
        }
        self.value.as_str()
    }
}

/// Request body of `editMetadata`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FieldList {
    pub fields: Vec<MetadataField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ResumeStatus {
    Success,
    Failure,
}

impl std::fmt::Display for ResumeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
        }
    }
}

/// Body of the workflow resume call. `reason` is the machine-facing cause,
/// `message` what Dataverse shows the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResumeMessage {
    pub status: ResumeStatus,
    pub reason: String,
    pub message: String,
}

impl ResumeMessage {
    pub fn success() -> Self {
        Self {
            status: ResumeStatus::Success,
            reason: String::new(),
            message: String::new(),
        }
    }

    pub fn failure(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ResumeStatus::Failure,
            reason: reason.into(),
            message: message.into(),
        }
    }
}

/// Shared secret that unlocks writes to a protected metadata block.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultMetadataKey {
    pub block_name: String,
    pub value: String,
}

impl VaultMetadataKey {
    pub fn query_param(&self) -> (String, String) {
        (format!("mdkey.{}", self.block_name), self.value.clone())
    }
}

impl std::fmt::Debug for VaultMetadataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultMetadataKey")
            .field("block_name", &self.block_name)
            .field("value", &"<redacted>")
            .finish()
    }
}
