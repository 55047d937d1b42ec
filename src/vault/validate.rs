use super::fields::{FieldSet, DANS_BAG_ID, DANS_DATAVERSE_PID, DANS_DATAVERSE_PID_VERSION, DANS_NBN};
use super::TaskError;
use crate::dataverse::{DatasetVersion, StepInvocation};
use crate::runtime::logging::TaskLogger;
use crate::shared::ids::{is_valid_bag_id, is_valid_nbn};

/// Checks the synthesized fields before they are written.
///
/// Every version needs a `urn:uuid` bag id and a `urn:nbn` NBN. Versions
/// after 1.0 additionally need a released or deaccessioned predecessor, and
/// every such predecessor must carry the same pid and NBN.
pub fn validate_bag_metadata(
    invocation: &StepInvocation,
    fields: &FieldSet,
    history: &[DatasetVersion],
    log: &TaskLogger,
) -> Result<(), TaskError> {
    let bag_id = required(DANS_BAG_ID, &fields.bag_id)?;
    let nbn = required(DANS_NBN, &fields.nbn)?;

    log.debug(
        "vault.validate.bag_id",
        &format!("validating bag id '{bag_id}' as urn:uuid"),
    );
    if !is_valid_bag_id(bag_id) {
        return Err(TaskError::Validation(format!(
            "'{bag_id}' is not a valid urn:uuid"
        )));
    }

    log.debug(
        "vault.validate.nbn",
        &format!("validating nbn '{nbn}' as urn:nbn"),
    );
    if !is_valid_nbn(nbn) {
        return Err(TaskError::Validation(format!("'{nbn}' is not a valid urn:nbn")));
    }

    let requested = invocation.version();
    if !requested.follows_first() {
        return Ok(());
    }

    required(DANS_DATAVERSE_PID_VERSION, &fields.dataverse_pid_version)?;
    let pid = required(DANS_DATAVERSE_PID, &fields.dataverse_pid)?;

    if history.is_empty() {
        return Err(TaskError::Validation(format!(
            "Version {requested} is greater than 1.0, but no previous version found"
        )));
    }

    for version in history {
        let other_pid = historical_field(version, DANS_DATAVERSE_PID)?;
        let other_nbn = historical_field(version, DANS_NBN)?;
        ensure_same(DANS_DATAVERSE_PID, pid, version, other_pid)?;
        ensure_same(DANS_NBN, nbn, version, other_nbn)?;
    }
    Ok(())
}

fn required<'a>(name: &str, value: &'a str) -> Result<&'a str, TaskError> {
    if value.trim().is_empty() {
        return Err(TaskError::Validation(format!(
            "'{name}' missing from metadata"
        )));
    }
    Ok(value)
}

fn historical_field<'a>(version: &'a DatasetVersion, name: &str) -> Result<&'a str, TaskError> {
    version.vault_field(name).ok_or_else(|| {
        TaskError::InconsistentState(format!(
            "Released or deaccessioned version found without '{name}' property (version {})",
            version.version()
        ))
    })
}

fn ensure_same(
    name: &str,
    expected: &str,
    version: &DatasetVersion,
    found: &str,
) -> Result<(), TaskError> {
    if expected == found {
        return Ok(());
    }
    Err(TaskError::InconsistentState(format!(
        "Mismatch in '{name}' property, expected '{expected}' in version {}, but instead found '{found}'",
        version.version()
    )))
}
