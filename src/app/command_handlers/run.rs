use crate::app::cli::split_common_args;
use crate::app::command_support::{load_cli_settings, logger_for, map_runtime_err, read_invocation};
use crate::runtime::task_context_from_settings;
use crate::vault::{TaskState, VaultMetadataTask};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub fn cmd_run(args: &[String]) -> Result<String, String> {
    let parsed = split_common_args(args)?;
    let [source] = parsed.positional.as_slice() else {
        return Err("usage: run [--config PATH] <invocation.json|->".to_string());
    };
    let settings = load_cli_settings(parsed.config.as_deref())?;
    let log = logger_for(&settings)?;
    let invocation = read_invocation(source).map_err(map_runtime_err)?;

    let context = task_context_from_settings(&settings, log, Arc::new(AtomicBool::new(false)));
    let task = VaultMetadataTask::new(invocation, context);
    let state = task.run();
    let summary = format!(
        "invocation={} dataset={} state={state}",
        task.invocation().invocation_id,
        task.invocation().global_id
    );
    match state {
        TaskState::ResumedSuccess => Ok(summary),
        _ => Err(summary),
    }
}
