pub mod logging;
pub mod retry;
pub mod task_queue;
pub mod worker_primitives;

pub use crate::shared::errors::RuntimeError;
pub use logging::{LogLevel, LogSink, TaskLogger};
pub use retry::{Backoff, RetryOutcome, RetryPolicy};
pub use task_queue::{Job, TaskQueue};

use crate::config::Settings;
use crate::dataverse::{DataverseClient, StepInvocation};
use crate::shared::ids::UuidIdMinter;
use crate::vault::{TaskContext, VaultMetadataTask, WorkflowResumer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Wires the Dataverse client, minter, resumer and metadata key from
/// settings.
pub fn task_context_from_settings(
    settings: &Settings,
    log: TaskLogger,
    stop: Arc<AtomicBool>,
) -> TaskContext {
    TaskContext {
        client: Arc::new(DataverseClient::new(&settings.dataverse)),
        minter: Arc::new(UuidIdMinter),
        resumer: WorkflowResumer::default().with_stop(stop),
        key: settings.vault_metadata_key.build(),
        log,
    }
}

/// Runs one vault metadata task per submitted invocation on the task queue.
pub struct Dispatcher {
    queue: TaskQueue,
    context: TaskContext,
    stop: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(queue: TaskQueue, context: TaskContext, stop: Arc<AtomicBool>) -> Self {
        Self {
            queue,
            context,
            stop,
        }
    }

    pub fn from_settings(settings: &Settings, log: TaskLogger) -> Result<Self, RuntimeError> {
        let stop = Arc::new(AtomicBool::new(false));
        let context = task_context_from_settings(settings, log, Arc::clone(&stop));
        let queue = TaskQueue::start(&settings.task_queue)?;
        context.log.info(
            "dispatcher.started",
            &format!(
                "task queue started with {} workers, capacity {}",
                queue.worker_count(),
                queue.capacity()
            ),
        );
        Ok(Self::new(queue, context, stop))
    }

    pub fn log(&self) -> &TaskLogger {
        &self.context.log
    }

    /// Queues a task for `invocation`; fails with `QueueFull` when every
    /// slot is taken.
    pub fn dispatch(&self, invocation: StepInvocation) -> Result<(), RuntimeError> {
        let log = self.context.log.with_invocation(&invocation);
        let result = self.submit(invocation);
        match &result {
            Ok(()) => log.debug("dispatcher.queued", "task queued"),
            Err(err) => log.error("dispatcher.rejected", &err.to_string()),
        }
        result
    }

    /// Like `dispatch`, but waits for a free slot while the queue is full.
    pub fn dispatch_with_backpressure(
        &self,
        invocation: StepInvocation,
        policy: RetryPolicy,
    ) -> Result<(), RuntimeError> {
        let log = self.context.log.with_invocation(&invocation);
        let outcome = policy.run(
            Some(self.stop.as_ref()),
            |_| self.submit(invocation.clone()),
            |err| matches!(err, RuntimeError::QueueFull { .. }),
            |attempt, _, delay| {
                log.debug(
                    "dispatcher.backpressure",
                    &format!("queue full on attempt {attempt}, waiting {} ms", delay.as_millis()),
                );
            },
        );
        match &outcome.result {
            Ok(()) => log.debug("dispatcher.queued", "task queued"),
            Err(err) => log.error("dispatcher.rejected", &err.to_string()),
        }
        outcome.result
    }

    fn submit(&self, invocation: StepInvocation) -> Result<(), RuntimeError> {
        let task = VaultMetadataTask::new(invocation, self.context.clone());
        self.queue.submit(Box::new(move || {
            task.run();
        }))
    }

    /// Lets queued tasks finish, including their resume retries.
    pub fn shutdown(self) {
        self.context
            .log
            .info("dispatcher.stopping", "draining task queue");
        self.queue.shutdown();
    }

    /// Like `shutdown`, but cuts resume retry waits short.
    pub fn shutdown_now(self) {
        self.stop.store(true, Ordering::Relaxed);
        self.shutdown();
    }
}
