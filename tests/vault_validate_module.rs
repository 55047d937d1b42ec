mod support;

use dd_vault_metadata::dataverse::VersionState;
use dd_vault_metadata::vault::{validate_bag_metadata, FieldSet, TaskError};
use support::{
    invocation, memory_logger, released, version, BAG_ID_A, BAG_ID_B, GLOBAL_ID, NBN, OTHER_NBN,
};

fn fields(version: &str, bag_id: &str, nbn: &str) -> FieldSet {
    FieldSet {
        dataverse_pid: GLOBAL_ID.to_string(),
        dataverse_pid_version: version.to_string(),
        bag_id: bag_id.to_string(),
        nbn: nbn.to_string(),
    }
}

#[test]
fn vault_validate_module_accepts_consistent_history() {
    let history = vec![released(1, 1, BAG_ID_B, NBN), released(1, 0, BAG_ID_B, NBN)];

    validate_bag_metadata(
        &invocation(2, 0),
        &fields("2.0", BAG_ID_A, NBN),
        &history,
        &memory_logger(),
    )
    .expect("valid");
}

#[test]
fn vault_validate_module_requires_bag_id_and_nbn() {
    let log = memory_logger();

    let err = validate_bag_metadata(&invocation(1, 0), &fields("1.0", " ", NBN), &[], &log)
        .expect_err("missing bag id");
    assert!(matches!(err, TaskError::Validation(_)));
    assert_eq!(err.to_string(), "'dansBagId' missing from metadata");

    let err = validate_bag_metadata(&invocation(1, 0), &fields("1.0", BAG_ID_A, ""), &[], &log)
        .expect_err("missing nbn");
    assert_eq!(err.to_string(), "'dansNbn' missing from metadata");
}

#[test]
fn vault_validate_module_rejects_malformed_identifiers() {
    let log = memory_logger();

    let err = validate_bag_metadata(
        &invocation(1, 0),
        &fields("1.0", "urn:uuid:not-a-uuid", NBN),
        &[],
        &log,
    )
    .expect_err("bad bag id");
    assert!(matches!(err, TaskError::Validation(_)));
    assert_eq!(err.to_string(), "'urn:uuid:not-a-uuid' is not a valid urn:uuid");

    let err = validate_bag_metadata(&invocation(1, 0), &fields("1.0", BAG_ID_A, BAG_ID_B), &[], &log)
        .expect_err("bad nbn");
    assert!(matches!(err, TaskError::Validation(_)));
    assert!(err.to_string().ends_with("is not a valid urn:nbn"), "{err}");
}

#[test]
fn vault_validate_module_requires_previous_version_after_first() {
    let err = validate_bag_metadata(
        &invocation(1, 1),
        &fields("1.1", BAG_ID_A, NBN),
        &[],
        &memory_logger(),
    )
    .expect_err("no history");

    assert!(matches!(err, TaskError::Validation(_)));
    assert_eq!(
        err.to_string(),
        "Version 1.1 is greater than 1.0, but no previous version found"
    );
}

#[test]
fn vault_validate_module_names_version_missing_nbn() {
    let history = vec![
        version(1, 1, VersionState::Released, Some(BAG_ID_B), None, Some(GLOBAL_ID)),
        released(1, 0, BAG_ID_B, NBN),
    ];

    let err = validate_bag_metadata(
        &invocation(1, 2),
        &fields("1.2", BAG_ID_A, NBN),
        &history,
        &memory_logger(),
    )
    .expect_err("missing nbn in history");

    assert!(matches!(err, TaskError::InconsistentState(_)), "{err:?}");
    assert_eq!(
        err.to_string(),
        "Released or deaccessioned version found without 'dansNbn' property (version 1.1)"
    );
}

#[test]
fn vault_validate_module_names_version_missing_pid() {
    let history = vec![version(
        1,
        0,
        VersionState::Deaccessioned,
        Some(BAG_ID_B),
        Some(NBN),
        None,
    )];

    let err = validate_bag_metadata(
        &invocation(1, 1),
        &fields("1.1", BAG_ID_A, NBN),
        &history,
        &memory_logger(),
    )
    .expect_err("missing pid in history");

    assert!(matches!(err, TaskError::InconsistentState(_)));
    assert!(err.to_string().contains("'dansDataversePid'"), "{err}");
    assert!(err.to_string().contains("version 1.0"), "{err}");
}

#[test]
fn vault_validate_module_reports_nbn_mismatch() {
    let history = vec![released(1, 0, BAG_ID_B, OTHER_NBN)];

    let err = validate_bag_metadata(
        &invocation(1, 1),
        &fields("1.1", BAG_ID_A, NBN),
        &history,
        &memory_logger(),
    )
    .expect_err("nbn mismatch");

    assert!(matches!(err, TaskError::InconsistentState(_)));
    assert_eq!(
        err.to_string(),
        format!(
            "Mismatch in 'dansNbn' property, expected '{NBN}' in version 1.0, but instead found '{OTHER_NBN}'"
        )
    );
}

#[test]
fn vault_validate_module_reports_pid_mismatch() {
    let history = vec![version(
        1,
        0,
        VersionState::Released,
        Some(BAG_ID_B),
        Some(NBN),
        Some("doi:10.5072/FK2/OTHER"),
    )];

    let err = validate_bag_metadata(
        &invocation(1, 1),
        &fields("1.1", BAG_ID_A, NBN),
        &history,
        &memory_logger(),
    )
    .expect_err("pid mismatch");

    assert!(err
        .to_string()
        .starts_with("Mismatch in 'dansDataversePid' property"));
}

#[test]
fn vault_validate_module_skips_history_checks_for_first_version() {
    let history = vec![version(1, 0, VersionState::Released, None, None, None)];

    validate_bag_metadata(
        &invocation(1, 0),
        &fields("1.0", BAG_ID_A, NBN),
        &history,
        &memory_logger(),
    )
    .expect("1.0 is exempt");
}
