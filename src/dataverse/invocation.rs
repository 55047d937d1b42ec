use super::version::VersionNumber;
use crate::shared::serde_ext::{string_from_number_or_string, u32_from_number_or_string};
use serde::{Deserialize, Serialize};

/// The body Dataverse posts when a publication workflow reaches this step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInvocation {
    pub invocation_id: String,
    pub global_id: String,
    #[serde(deserialize_with = "string_from_number_or_string")]
    pub dataset_id: String,
    #[serde(deserialize_with = "u32_from_number_or_string")]
    pub major_version: u32,
    #[serde(deserialize_with = "u32_from_number_or_string")]
    pub minor_version: u32,
}

impl StepInvocation {
    pub fn new(
        invocation_id: impl Into<String>,
        global_id: impl Into<String>,
        dataset_id: impl Into<String>,
        major_version: u32,
        minor_version: u32,
    ) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            global_id: global_id.into(),
            dataset_id: dataset_id.into(),
            major_version,
            minor_version,
        }
    }

    /// The version being published.
    pub fn version(&self) -> VersionNumber {
        VersionNumber::new(self.major_version, self.minor_version)
    }
}
