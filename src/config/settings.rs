use super::ConfigError;
use crate::dataverse::{VaultMetadataKey, VAULT_METADATA_BLOCK};
use crate::runtime::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub dataverse: DataverseConfig,
    #[serde(default)]
    pub task_queue: TaskQueueConfig,
    #[serde(default)]
    pub vault_metadata_key: VaultMetadataKeyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DataverseConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_await_lock_max_checks")]
    pub await_lock_max_checks: u32,
    #[serde(default = "default_await_lock_interval_ms")]
    pub await_lock_interval_ms: u64,
}

impl DataverseConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            await_lock_max_checks: default_await_lock_max_checks(),
            await_lock_interval_ms: default_await_lock_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaskQueueConfig {
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
}

impl Default for TaskQueueConfig {
    fn default() -> Self {
        Self {
            name_prefix: default_name_prefix(),
            max_threads: default_max_threads(),
            max_queue_size: default_max_queue_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultMetadataKeyConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_block_name")]
    pub block_name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Default for VaultMetadataKeyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            block_name: default_block_name(),
            value: None,
        }
    }
}

impl VaultMetadataKeyConfig {
    /// The key to send with edit requests; `None` when disabled.
    pub fn build(&self) -> Option<VaultMetadataKey> {
        if !self.enabled {
            return None;
        }
        let value = self.value.as_deref().filter(|v| !v.trim().is_empty())?;
        Some(VaultMetadataKey {
            block_name: self.block_name.clone(),
            value: value.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_await_lock_max_checks() -> u32 {
    30
}

fn default_await_lock_interval_ms() -> u64 {
    500
}

fn default_name_prefix() -> String {
    "vault-metadata-worker".to_string()
}

fn default_max_threads() -> usize {
    5
}

fn default_max_queue_size() -> usize {
    5000
}

fn default_block_name() -> String {
    VAULT_METADATA_BLOCK.to_string()
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.dataverse.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Settings(
                "`dataverse.base_url` must be an http(s) url".to_string(),
            ));
        }
        if self.dataverse.request_timeout_secs == 0 {
            return Err(ConfigError::Settings(
                "`dataverse.request_timeout_secs` must be > 0".to_string(),
            ));
        }
        if self.dataverse.await_lock_max_checks == 0 {
            return Err(ConfigError::Settings(
                "`dataverse.await_lock_max_checks` must be > 0".to_string(),
            ));
        }
        if self.task_queue.max_threads == 0 {
            return Err(ConfigError::Settings(
                "`task_queue.max_threads` must be > 0".to_string(),
            ));
        }
        if self.task_queue.max_queue_size == 0 {
            return Err(ConfigError::Settings(
                "`task_queue.max_queue_size` must be > 0".to_string(),
            ));
        }
        if self.task_queue.name_prefix.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`task_queue.name_prefix` must be non-empty".to_string(),
            ));
        }

        let key = &self.vault_metadata_key;
        if key.enabled {
            if key.block_name.trim().is_empty() {
                return Err(ConfigError::Settings(
                    "`vault_metadata_key.block_name` must be non-empty when enabled".to_string(),
                ));
            }
            if !matches!(key.value.as_deref(), Some(v) if !v.trim().is_empty()) {
                return Err(ConfigError::Settings(
                    "`vault_metadata_key.value` is required when enabled".to_string(),
                ));
            }
        }
        Ok(())
    }
}
