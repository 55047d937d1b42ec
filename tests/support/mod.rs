#![allow(dead_code)]

use dd_vault_metadata::dataverse::{
    DatasetVersion, DataverseError, FieldList, MetadataBlock, MetadataField, RepositoryClient,
    ResumeMessage, StepInvocation, VaultMetadataKey, VersionState, VAULT_METADATA_BLOCK,
};
use dd_vault_metadata::runtime::{LogLevel, LogSink, RetryPolicy, TaskLogger};
use dd_vault_metadata::shared::ids::IdMinter;
use dd_vault_metadata::vault::{TaskContext, WorkflowResumer};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GLOBAL_ID: &str = "doi:10.5072/FK2/VAULT";
pub const BAG_ID_A: &str = "urn:uuid:aaaaaaaa-4430-4186-bf58-08d98d717889";
pub const BAG_ID_B: &str = "urn:uuid:bbbbbbbb-4430-4186-bf58-08d98d717889";
pub const BAG_ID_C: &str = "urn:uuid:cccccccc-4430-4186-bf58-08d98d717889";
pub const MINTED_BAG_ID: &str = "urn:uuid:cbdf4d18-65af-42d2-baf3-6ca07ddfd3b2";
pub const NBN: &str = "urn:nbn:nl:ui:13-73750978-5587-4e2b-937f-6b190e44fcae";
pub const OTHER_NBN: &str = "urn:nbn:nl:ui:13-0b3c9a6e-1f1d-4c55-9d7b-2f3a7c1e5a11";
pub const MINTED_NBN: &str = "urn:nbn:nl:ui:13-5e1f7c2a-3b4d-4e6f-8a9b-0c1d2e3f4a5b";

pub fn invocation(major: u32, minor: u32) -> StepInvocation {
    StepInvocation::new("invocation-1", GLOBAL_ID, "42", major, minor)
}

/// A version whose vault block holds the given fields; `None` leaves a
/// field out.
pub fn version(
    major: u32,
    minor: u32,
    state: VersionState,
    bag_id: Option<&str>,
    nbn: Option<&str>,
    pid: Option<&str>,
) -> DatasetVersion {
    let mut fields = Vec::new();
    if let Some(pid) = pid {
        fields.push(MetadataField::primitive("dansDataversePid", pid));
    }
    if let Some(bag_id) = bag_id {
        fields.push(MetadataField::primitive("dansBagId", bag_id));
    }
    if let Some(nbn) = nbn {
        fields.push(MetadataField::primitive("dansNbn", nbn));
    }
    let mut version = DatasetVersion {
        version_number: Some(major),
        version_minor_number: Some(minor),
        version_state: state,
        ..DatasetVersion::default()
    };
    version.metadata_blocks.insert(
        VAULT_METADATA_BLOCK.to_string(),
        MetadataBlock {
            display_name: None,
            fields,
        },
    );
    version
}

pub fn draft(bag_id: Option<&str>, nbn: Option<&str>) -> DatasetVersion {
    let mut draft = version(0, 0, VersionState::Draft, bag_id, nbn, Some(GLOBAL_ID));
    draft.version_number = None;
    draft.version_minor_number = None;
    draft
}

pub fn draft_without_vault_block() -> DatasetVersion {
    DatasetVersion {
        version_state: VersionState::Draft,
        ..DatasetVersion::default()
    }
}

pub fn released(major: u32, minor: u32, bag_id: &str, nbn: &str) -> DatasetVersion {
    version(
        major,
        minor,
        VersionState::Released,
        Some(bag_id),
        Some(nbn),
        Some(GLOBAL_ID),
    )
}

pub fn status_error(status: u16) -> DataverseError {
    DataverseError::Status {
        status,
        method: "POST",
        url: "http://dataverse.test/api/workflows/invocation-1".to_string(),
        message: format!("fake status {status}"),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Lock,
    GetVersion(String),
    GetHistory,
    Edit {
        fields: FieldList,
        key: Option<VaultMetadataKey>,
    },
    Resume(ResumeMessage),
}

/// In-memory repository. Failures are given as HTTP status codes.
#[derive(Default)]
pub struct FakeRepository {
    draft: Option<DatasetVersion>,
    history: Vec<DatasetVersion>,
    lock_failure: Option<u16>,
    edit_failure: Option<u16>,
    resume_results: Mutex<VecDeque<Result<(), u16>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(mut self, draft: DatasetVersion) -> Self {
        self.draft = Some(draft);
        self
    }

    pub fn with_history(mut self, history: Vec<DatasetVersion>) -> Self {
        self.history = history;
        self
    }

    pub fn with_lock_failure(mut self, status: u16) -> Self {
        self.lock_failure = Some(status);
        self
    }

    pub fn with_edit_failure(mut self, status: u16) -> Self {
        self.edit_failure = Some(status);
        self
    }

    /// Results handed out by successive resume calls; `Ok` once exhausted.
    pub fn with_resume_results(self, results: Vec<Result<(), u16>>) -> Self {
        *self.resume_results.lock().expect("resume lock") = results.into();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn resumes(&self) -> Vec<ResumeMessage> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Resume(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<(FieldList, Option<VaultMetadataKey>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Edit { fields, key } => Some((fields, key)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl RepositoryClient for FakeRepository {
    fn get_version(
        &self,
        _invocation: &StepInvocation,
        version_tag: &str,
    ) -> Result<Option<DatasetVersion>, DataverseError> {
        self.record(Call::GetVersion(version_tag.to_string()));
        Ok(self.draft.clone())
    }

    fn get_released_or_deaccessioned_versions(
        &self,
        _invocation: &StepInvocation,
    ) -> Result<Vec<DatasetVersion>, DataverseError> {
        self.record(Call::GetHistory);
        Ok(self.history.clone())
    }

    fn lock_dataset(&self, _invocation: &StepInvocation) -> Result<(), DataverseError> {
        self.record(Call::Lock);
        match self.lock_failure {
            Some(status) => Err(status_error(status)),
            None => Ok(()),
        }
    }

    fn edit_metadata(
        &self,
        _invocation: &StepInvocation,
        fields: &FieldList,
        key: Option<&VaultMetadataKey>,
    ) -> Result<(), DataverseError> {
        self.record(Call::Edit {
            fields: fields.clone(),
            key: key.cloned(),
        });
        match self.edit_failure {
            Some(status) => Err(status_error(status)),
            None => Ok(()),
        }
    }

    fn resume_workflow(
        &self,
        _invocation: &StepInvocation,
        message: &ResumeMessage,
    ) -> Result<(), DataverseError> {
        self.record(Call::Resume(message.clone()));
        let next = self
            .resume_results
            .lock()
            .expect("resume lock")
            .pop_front()
            .unwrap_or(Ok(()));
        next.map_err(status_error)
    }
}

/// Hands out fixed identifiers and counts how often it was asked.
#[derive(Default)]
pub struct FixedMinter {
    pub bag_ids_minted: AtomicUsize,
    pub nbns_minted: AtomicUsize,
}

impl FixedMinter {
    pub fn bag_ids(&self) -> usize {
        self.bag_ids_minted.load(Ordering::SeqCst)
    }

    pub fn nbns(&self) -> usize {
        self.nbns_minted.load(Ordering::SeqCst)
    }
}

impl IdMinter for FixedMinter {
    fn mint_bag_id(&self) -> String {
        self.bag_ids_minted.fetch_add(1, Ordering::SeqCst);
        MINTED_BAG_ID.to_string()
    }

    fn mint_nbn(&self) -> String {
        self.nbns_minted.fetch_add(1, Ordering::SeqCst);
        MINTED_NBN.to_string()
    }
}

pub fn memory_logger() -> TaskLogger {
    TaskLogger::new(LogSink::memory(), LogLevel::Debug)
}

pub fn fast_resumer() -> WorkflowResumer {
    WorkflowResumer::new(RetryPolicy::fixed(10, Duration::from_millis(5)))
}

pub fn context(
    repository: Arc<FakeRepository>,
    key: Option<VaultMetadataKey>,
    log: TaskLogger,
) -> TaskContext {
    TaskContext {
        client: repository,
        minter: Arc::new(FixedMinter::default()),
        resumer: fast_resumer(),
        key,
        log,
    }
}
