pub mod error;
pub mod load;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use load::{load_default_settings, load_settings};
pub use paths::{default_config_path, CONFIG_PATH_ENV, GLOBAL_SETTINGS_FILE_NAME, GLOBAL_STATE_DIR};
pub use settings::{
    DataverseConfig, LoggingConfig, Settings, TaskQueueConfig, VaultMetadataKeyConfig,
};
