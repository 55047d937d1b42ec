use crate::dataverse::{DataverseError, RepositoryClient, ResumeMessage, StepInvocation};
use crate::runtime::logging::TaskLogger;
use crate::runtime::retry::RetryPolicy;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

pub const RESUME_MAX_ATTEMPTS: u32 = 10;
pub const RESUME_RETRY_DELAY_MS: u64 = 1000;

/// Resumes the paused Dataverse workflow. A 404 means the paused workflow
/// is not visible yet and is retried; any other failure is returned as is.
#[derive(Debug, Clone)]
pub struct WorkflowResumer {
    policy: RetryPolicy,
    stop: Option<Arc<AtomicBool>>,
}

impl Default for WorkflowResumer {
    fn default() -> Self {
        Self::new(RetryPolicy::fixed(
            RESUME_MAX_ATTEMPTS,
            Duration::from_millis(RESUME_RETRY_DELAY_MS),
        ))
    }
}

impl WorkflowResumer {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, stop: None }
    }

    /// Aborts the wait between attempts once `stop` is raised.
    pub fn with_stop(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn resume(
        &self,
        client: &dyn RepositoryClient,
        invocation: &StepInvocation,
        message: &ResumeMessage,
        log: &TaskLogger,
    ) -> Result<(), DataverseError> {
        let outcome = self.policy.run(
            self.stop.as_deref(),
            |attempt| {
                log.debug(
                    "workflow.resume.attempt",
                    &format!("resuming workflow with {}, attempt {attempt}", message.status),
                );
                client.resume_workflow(invocation, message)
            },
            DataverseError::is_not_found,
            |attempt, err, delay| {
                log.warn(
                    "workflow.resume.retry",
                    &format!(
                        "attempt {attempt} could not resume workflow ({err}); retrying in {} ms",
                        delay.as_millis()
                    ),
                );
            },
        );

        if let Err(err) = &outcome.result {
            log.error(
                "workflow.resume.failed",
                &format!(
                    "workflow could not be resumed after {} attempt(s): {err}",
                    outcome.attempts
                ),
            );
        }
        outcome.result
    }
}
