use dd_vault_metadata::runtime::LogLevel;
use dd_vault_metadata::shared::serde_ext::{string_from_number_or_string, u32_from_number_or_string};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Versioned {
    #[serde(deserialize_with = "u32_from_number_or_string")]
    major: u32,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(deserialize_with = "string_from_number_or_string")]
    id: String,
}

#[test]
fn shared_serde_ext_module_parses_log_level_from_string() {
    let parsed: LogLevel = serde_yaml::from_str("\"  Warning \"").expect("parse level");
    assert_eq!(parsed, LogLevel::Warn);
}

#[test]
fn shared_serde_ext_module_reports_formatted_parse_error() {
    let err = serde_yaml::from_str::<LogLevel>("loud").expect_err("unknown level");
    assert!(err.to_string().contains("invalid log level `loud`"));
}

#[test]
fn shared_serde_ext_module_accepts_numeric_and_string_versions() {
    let numeric: Versioned = serde_json::from_str(r#"{"major": 3}"#).expect("number");
    let text: Versioned = serde_json::from_str(r#"{"major": " 4 "}"#).expect("string");
    assert_eq!(numeric.major, 3);
    assert_eq!(text.major, 4);

    let err = serde_json::from_str::<Versioned>(r#"{"major": "-1"}"#).expect_err("negative");
    assert!(err.to_string().contains("invalid version number `-1`"));
}

#[test]
fn shared_serde_ext_module_keeps_numeric_ids_as_text() {
    let numeric: Dataset = serde_json::from_str(r#"{"id": 12}"#).expect("number");
    let text: Dataset = serde_json::from_str(r#"{"id": "12"}"#).expect("string");
    assert_eq!(numeric.id, "12");
    assert_eq!(text.id, "12");
    assert!(serde_json::from_str::<Dataset>(r#"{"id": [12]}"#).is_err());
}
