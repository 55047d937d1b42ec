use crate::config::{default_config_path, load_default_settings, load_settings, ConfigError, Settings};
use crate::dataverse::StepInvocation;
use crate::runtime::{RuntimeError, TaskLogger};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

pub fn map_runtime_err(err: RuntimeError) -> String {
    err.to_string()
}

pub fn resolve_config_path(config: Option<&str>) -> Result<PathBuf, String> {
    match config {
        Some(path) => Ok(PathBuf::from(path)),
        None => default_config_path().map_err(map_config_err),
    }
}

pub fn load_cli_settings(config: Option<&str>) -> Result<Settings, String> {
    match config {
        Some(path) => load_settings(Path::new(path)),
        None => load_default_settings(),
    }
    .map_err(map_config_err)
}

pub fn logger_for(settings: &Settings) -> Result<TaskLogger, String> {
    TaskLogger::from_config(&settings.logging).map_err(map_runtime_err)
}

/// Reads one invocation from a file, or from stdin for `-`.
pub fn read_invocation(source: &str) -> Result<StepInvocation, RuntimeError> {
    let raw = if source == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|e| RuntimeError::ReadInvocation {
                path: "stdin".to_string(),
                source: e,
            })?;
        raw
    } else {
        fs::read_to_string(source).map_err(|e| RuntimeError::ReadInvocation {
            path: source.to_string(),
            source: e,
        })?
    };
    parse_invocation(source, &raw)
}

pub fn parse_invocation(origin: &str, raw: &str) -> Result<StepInvocation, RuntimeError> {
    serde_json::from_str(raw).map_err(|e| RuntimeError::ParseInvocation {
        path: origin.to_string(),
        source: e,
    })
}
