use crate::app::cli::split_common_args;
use crate::app::command_support::{load_cli_settings, resolve_config_path};

pub fn cmd_check_config(args: &[String]) -> Result<String, String> {
    let parsed = split_common_args(args)?;
    if !parsed.positional.is_empty() {
        return Err("usage: check-config [--config PATH]".to_string());
    }
    let path = resolve_config_path(parsed.config.as_deref())?;
    let settings = load_cli_settings(parsed.config.as_deref())?;
    let key_state = if settings.vault_metadata_key.build().is_some() {
        "enabled"
    } else {
        "disabled"
    };
    Ok(format!(
        "config ok: {}\ndataverse: {}\nworkers: {} (queue capacity {})\nvault metadata key: {key_state}",
        path.display(),
        settings.dataverse.base_url,
        settings.task_queue.max_threads,
        settings.task_queue.max_queue_size,
    ))
}
