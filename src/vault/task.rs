use super::resume::WorkflowResumer;
use super::synthesize::MetadataSynthesizer;
use super::validate::validate_bag_metadata;
use super::TaskError;
use crate::dataverse::{RepositoryClient, ResumeMessage, StepInvocation, VaultMetadataKey};
use crate::runtime::logging::TaskLogger;
use crate::shared::ids::IdMinter;
use std::sync::Arc;

pub const FAILURE_MESSAGE: &str = "Publication failed: pre-publication workflow returned an error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Start,
    Locked,
    Synthesized,
    Validated,
    Written,
    ResumedSuccess,
    ResumedFailure,
}

impl TaskState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Locked => "locked",
            Self::Synthesized => "synthesized",
            Self::Validated => "validated",
            Self::Written => "written",
            Self::ResumedSuccess => "resumed_success",
            Self::ResumedFailure => "resumed_failure",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collaborators shared by every task run.
#[derive(Clone)]
pub struct TaskContext {
    pub client: Arc<dyn RepositoryClient>,
    pub minter: Arc<dyn IdMinter>,
    pub resumer: WorkflowResumer,
    pub key: Option<VaultMetadataKey>,
    pub log: TaskLogger,
}

/// One vault metadata run for one step invocation.
pub struct VaultMetadataTask {
    invocation: StepInvocation,
    context: TaskContext,
    log: TaskLogger,
}

impl VaultMetadataTask {
    pub fn new(invocation: StepInvocation, context: TaskContext) -> Self {
        let log = context.log.with_invocation(&invocation);
        Self {
            invocation,
            context,
            log,
        }
    }

    pub fn invocation(&self) -> &StepInvocation {
        &self.invocation
    }

    /// Runs to a terminal state. Errors are reported to Dataverse through a
    /// failure resume and never returned.
    pub fn run(&self) -> TaskState {
        self.log.info(
            "task.started",
            &format!("running vault metadata task for version {}", self.invocation.version()),
        );
        let mut state = TaskState::Start;
        let terminal = match self.run_steps(&mut state) {
            Ok(()) => TaskState::ResumedSuccess,
            Err(err) => {
                self.log.error(
                    &format!("task.failed.{}", err.kind()),
                    &format!("vault metadata task failed in state {state}: {err}"),
                );
                self.resume_with_failure(&err);
                TaskState::ResumedFailure
            }
        };
        self.log.info(
            "task.completed",
            &format!("vault metadata task finished in state {terminal}"),
        );
        terminal
    }

    fn run_steps(&self, state: &mut TaskState) -> Result<(), TaskError> {
        let ctx = &self.context;
        let invocation = &self.invocation;

        self.log.info("dataset.lock", "locking dataset");
        ctx.client.lock_dataset(invocation)?;
        *state = TaskState::Locked;

        let synthesis =
            MetadataSynthesizer::new(ctx.client.as_ref(), ctx.minter.as_ref(), &self.log)
                .synthesize(invocation)?;
        *state = TaskState::Synthesized;

        self.log.info("vault.validate", "validating vault metadata");
        validate_bag_metadata(invocation, &synthesis.fields, &synthesis.history, &self.log)?;
        *state = TaskState::Validated;

        self.log.info("vault.write", "updating vault metadata");
        ctx.client
            .edit_metadata(invocation, &synthesis.fields.to_field_list(), ctx.key.as_ref())?;
        *state = TaskState::Written;

        ctx.resumer.resume(
            ctx.client.as_ref(),
            invocation,
            &ResumeMessage::success(),
            &self.log,
        )?;
        self.log.info("workflow.resumed", "vault metadata set, workflow resumed");
        Ok(())
    }

    /// Single attempt; the outcome is only logged.
    fn resume_with_failure(&self, err: &TaskError) {
        let message = ResumeMessage::failure(err.to_string(), FAILURE_MESSAGE);
        if let Err(resume_err) = self
            .context
            .client
            .resume_workflow(&self.invocation, &message)
        {
            self.log.error(
                "workflow.resume.failure_not_delivered",
                &format!("error resuming workflow with Failure status: {resume_err}"),
            );
        }
    }
}
