use super::fields::{FieldSet, DANS_BAG_ID, DANS_NBN};
use super::TaskError;
use crate::dataverse::version::find_duplicate_version;
use crate::dataverse::{DatasetVersion, RepositoryClient, StepInvocation, DRAFT_VERSION};
use crate::runtime::logging::TaskLogger;
use crate::shared::ids::IdMinter;
use std::collections::HashSet;

/// Synthesized fields together with the history they were derived from,
/// so validation checks against the same snapshot.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub fields: FieldSet,
    pub history: Vec<DatasetVersion>,
}

pub struct MetadataSynthesizer<'a> {
    client: &'a dyn RepositoryClient,
    minter: &'a dyn IdMinter,
    log: &'a TaskLogger,
}

impl<'a> MetadataSynthesizer<'a> {
    pub fn new(client: &'a dyn RepositoryClient, minter: &'a dyn IdMinter, log: &'a TaskLogger) -> Self {
        Self { client, minter, log }
    }

    pub fn synthesize(&self, invocation: &StepInvocation) -> Result<Synthesis, TaskError> {
        let draft = self
            .client
            .get_version(invocation, DRAFT_VERSION)?
            .ok_or_else(|| TaskError::NotFound {
                global_id: invocation.global_id.clone(),
            })?;

        let history = self
            .client
            .get_released_or_deaccessioned_versions(invocation)?;
        if let Some(duplicate) = find_duplicate_version(&history) {
            return Err(TaskError::InconsistentState(format!(
                "Dataset {} has more than one released or deaccessioned version {duplicate}",
                invocation.global_id
            )));
        }

        let bag_id = self.bag_id(&draft, &history);
        let nbn = self.nbn(&draft, &history)?;
        let fields = FieldSet {
            dataverse_pid: invocation.global_id.clone(),
            dataverse_pid_version: invocation.version().to_string(),
            bag_id,
            nbn,
        };

        self.log.debug(
            "vault.synthesized",
            &format!(
                "dansDataversePid={} dansDataversePidVersion={} dansBagId={} dansNbn={}",
                fields.dataverse_pid, fields.dataverse_pid_version, fields.bag_id, fields.nbn
            ),
        );
        Ok(Synthesis { fields, history })
    }

    /// Keeps the draft's bag id only when no published version uses it. A
    /// draft created in the UI inherits the previous version's bag id, while
    /// a machine deposit brings its own.
    fn bag_id(&self, draft: &DatasetVersion, history: &[DatasetVersion]) -> String {
        let published: HashSet<&str> = history
            .iter()
            .filter_map(|version| version.vault_field(DANS_BAG_ID))
            .collect();

        match draft.vault_field(DANS_BAG_ID) {
            Some(bag_id) if !published.contains(bag_id) => bag_id.to_string(),
            Some(bag_id) => {
                self.log.info(
                    "vault.bag_id.reminted",
                    &format!("draft bag id {bag_id} belongs to a published version"),
                );
                self.minter.mint_bag_id()
            }
            None => self.minter.mint_bag_id(),
        }
    }

    fn nbn(&self, draft: &DatasetVersion, history: &[DatasetVersion]) -> Result<String, TaskError> {
        if let Some(latest) = history.iter().max_by_key(|version| version.version()) {
            return latest
                .vault_field(DANS_NBN)
                .map(str::to_string)
                .ok_or_else(|| {
                    TaskError::InconsistentState(format!(
                        "Latest released or deaccessioned version {} has no '{DANS_NBN}' property",
                        latest.version()
                    ))
                });
        }
        Ok(draft
            .vault_field(DANS_NBN)
            .map(str::to_string)
            .unwrap_or_else(|| self.minter.mint_nbn()))
    }
}
