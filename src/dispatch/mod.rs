//! Command dispatcher — platform gate, project checks, provisioning, hand-off.
//!
//! ```text
//! Start → PlatformChecked → ProjectValidated → Provisioned → Dispatched
//!   └──────────────┴────────────────┴───────────────┴──→ Failed
//! ```

mod context;
mod error;
mod platform;
mod runner;

use std::path::Path;

use crate::args::{extraction_table, partition, FlagTable};
use crate::project::{ensure_provisioned, AssetTemplates, ProjectContext, ProvisionOutcome};

pub use context::{AlreadyAttached, InvocationContext, KeystoreOptions};
pub use error::DispatchError;
pub use platform::Platform;
pub use runner::{
    PlatformRunner, RunOutcome, RunRequest, RunnerError, RunnerRegistry, ScriptRunner,
    ENV_CONTEXT, ENV_PLATFORM, ENV_PROJECT_DIR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Start,
    PlatformChecked,
    ProjectValidated,
    Provisioned,
    Dispatched,
    Failed,
}

/// One invocation's inputs.
#[derive(Debug, Clone, Copy)]
pub struct DispatchRequest<'a> {
    pub platform: &'a str,
    pub raw_args: &'a [String],
    pub project_dir: &'a Path,
}

pub struct Dispatcher {
    flags: FlagTable,
    templates: AssetTemplates,
    runners: RunnerRegistry,
    state: DispatchState,
}

impl Dispatcher {
    pub fn new(templates: AssetTemplates, runners: RunnerRegistry) -> Self {
        Self {
            flags: extraction_table(),
            templates,
            runners,
            state: DispatchState::Start,
        }
    }

    /// Replace the testing-tool flag table.
    pub fn with_flags(mut self, flags: FlagTable) -> Self {
        self.flags = flags;
        self
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Run the pipeline and hand off to the platform runner.
    ///
    /// On error nothing after the failing step runs, and `context` is only
    /// written once provisioning has succeeded.
    pub fn dispatch(
        &mut self,
        request: &DispatchRequest<'_>,
        context: &mut InvocationContext,
    ) -> Result<RunOutcome, DispatchError> {
        let result = self.run_steps(request, context);
        if let Err(err) = &result {
            tracing::debug!(kind = err.kind(), "Dispatch failed in state {:?}", self.state);
            self.advance(DispatchState::Failed);
        }
        result
    }

    fn run_steps(
        &mut self,
        request: &DispatchRequest<'_>,
        context: &mut InvocationContext,
    ) -> Result<RunOutcome, DispatchError> {
        tracing::info!("Starting ticalabash for platform: {}", request.platform);

        let platform =
            Platform::parse(request.platform).ok_or_else(|| DispatchError::UnsupportedPlatform {
                platform: request.platform.to_string(),
            })?;
        self.advance(DispatchState::PlatformChecked);

        let project = ProjectContext::inspect(platform, request.project_dir);
        if !project.has_descriptor {
            return Err(DispatchError::InvalidProject {
                path: project.project_dir,
            });
        }
        self.advance(DispatchState::ProjectValidated);

        if project.has_alloy_app {
            tracing::debug!("Alloy app/ directory found; no Alloy-specific setup is performed");
        }

        if let ProvisionOutcome::Provisioned { files_copied } =
            ensure_provisioned(&project.project_dir, &self.templates)?
        {
            tracing::debug!(files_copied, "Provisioned Calabash assets");
        }
        self.advance(DispatchState::Provisioned);

        let runner_name = platform.runner_name();
        let runner = self
            .runners
            .get(runner_name)
            .ok_or_else(|| DispatchError::RunnerNotRegistered {
                runner: runner_name.to_string(),
            })?;

        let partitioned = partition(request.raw_args, &self.flags);
        for warning in &partitioned.warnings {
            tracing::warn!("{}", warning);
        }
        context.attach(partitioned)?;

        self.state = DispatchState::Dispatched;
        tracing::debug!("Dispatch state: {:?}", self.state);

        let outcome = runner.run(&RunRequest {
            runner: runner_name,
            project: &project,
            context: &*context,
        })?;
        Ok(outcome)
    }

    fn advance(&mut self, state: DispatchState) {
        self.state = state;
        tracing::debug!("Dispatch state: {:?}", state);
    }
}
