use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

pub fn parse_via_string<'de, D, T, F>(deserializer: D, kind: &str, parser: F) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    F: FnOnce(&str) -> Result<T, String>,
{
    let raw = String::deserialize(deserializer)?;
    parser(&raw).map_err(|err| D::Error::custom(format!("invalid {kind} `{raw}`: {err}")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u32),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdOrText {
    Number(u64),
    Text(String),
}

/// Dataverse renders version parts into step invocation bodies as strings
/// (`"majorVersion": "1"`); plain numbers are accepted as well.
pub fn u32_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|err| D::Error::custom(format!("invalid version number `{raw}`: {err}"))),
    }
}

/// Numeric database ids arrive as JSON numbers or strings; both are kept
/// as text.
pub fn string_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match IdOrText::deserialize(deserializer)? {
        IdOrText::Number(value) => Ok(value.to_string()),
        IdOrText::Text(raw) => Ok(raw),
    }
}
