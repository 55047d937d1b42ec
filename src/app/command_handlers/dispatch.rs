use crate::app::cli::split_common_args;
use crate::app::command_support::{load_cli_settings, logger_for, map_runtime_err, parse_invocation};
use crate::runtime::{Backoff, Dispatcher, RetryPolicy};
use std::io::BufRead;
use std::time::Duration;

/// Waits up to roughly two minutes for a free queue slot.
pub const SUBMIT_POLICY: RetryPolicy = RetryPolicy {
    max_attempts: 120,
    backoff: Backoff::Exponential {
        initial: Duration::from_millis(100),
        max: Duration::from_millis(1000),
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchSummary {
    pub queued: usize,
    pub skipped: usize,
    /// Input broke off with a read error rather than a clean EOF.
    pub interrupted: bool,
}

pub fn cmd_dispatch(args: &[String]) -> Result<String, String> {
    let parsed = split_common_args(args)?;
    if !parsed.positional.is_empty() {
        return Err("usage: dispatch [--config PATH]".to_string());
    }
    let settings = load_cli_settings(parsed.config.as_deref())?;
    let log = logger_for(&settings)?;
    let dispatcher = Dispatcher::from_settings(&settings, log).map_err(map_runtime_err)?;

    let stdin = std::io::stdin();
    let summary = dispatch_lines(&dispatcher, stdin.lock());
    let message = format!(
        "queued {} invocation(s), skipped {}",
        summary.queued, summary.skipped
    );
    if summary.interrupted {
        dispatcher.shutdown_now();
        return Err(format!("{message}; input interrupted, pending resume retries abandoned"));
    }
    dispatcher.shutdown();
    Ok(message)
}

/// Feeds newline-delimited invocation JSON to the dispatcher. Blank lines
/// are ignored; unparseable or rejected lines are logged and skipped. A read
/// error ends the loop and marks the summary as interrupted.
pub fn dispatch_lines<R: BufRead>(dispatcher: &Dispatcher, reader: R) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    for (index, line) in reader.lines().enumerate() {
        let origin = format!("stdin line {}", index + 1);
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                dispatcher
                    .log()
                    .error("dispatch.read_failed", &format!("{origin}: {err}"));
                summary.interrupted = true;
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let invocation = match parse_invocation(&origin, &line) {
            Ok(invocation) => invocation,
            Err(err) => {
                dispatcher
                    .log()
                    .warn("dispatch.invalid_invocation", &err.to_string());
                summary.skipped += 1;
                continue;
            }
        };
        match dispatcher.dispatch_with_backpressure(invocation, SUBMIT_POLICY) {
            Ok(()) => summary.queued += 1,
            Err(_) => summary.skipped += 1,
        }
    }
    summary
}
