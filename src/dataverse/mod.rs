pub mod client;
pub mod error;
pub mod invocation;
pub mod model;
pub mod version;

pub use client::DataverseClient;
pub use error::DataverseError;
pub use invocation::StepInvocation;
pub use model::{
    DatasetVersion, FieldList, MetadataBlock, MetadataField, ResumeMessage, ResumeStatus,
    VaultMetadataKey, VersionState, VAULT_METADATA_BLOCK,
};
pub use version::VersionNumber;

pub const DRAFT_VERSION: &str = ":draft";

/// The slice of the Dataverse API a vault metadata run needs. Tests
/// implement it directly.
pub trait RepositoryClient: Send + Sync {
    /// `Ok(None)` when Dataverse answers 404 for the version.
    fn get_version(
        &self,
        invocation: &StepInvocation,
        version_tag: &str,
    ) -> Result<Option<DatasetVersion>, DataverseError>;

    /// Released and deaccessioned versions, newest first.
    fn get_released_or_deaccessioned_versions(
        &self,
        invocation: &StepInvocation,
    ) -> Result<Vec<DatasetVersion>, DataverseError>;

    fn lock_dataset(&self, invocation: &StepInvocation) -> Result<(), DataverseError>;

    fn edit_metadata(
        &self,
        invocation: &StepInvocation,
        fields: &FieldList,
        key: Option<&VaultMetadataKey>,
    ) -> Result<(), DataverseError>;

    fn resume_workflow(
        &self,
        invocation: &StepInvocation,
        message: &ResumeMessage,
    ) -> Result<(), DataverseError>;
}
