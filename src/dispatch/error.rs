//! Errors that abort a ticalabash invocation.

use std::path::PathBuf;

use thiserror::Error;

use crate::dispatch::context::AlreadyAttached;
use crate::dispatch::runner::RunnerError;
use crate::dispatch::Platform;
use crate::project::ProvisionError;

/// Every fatal condition of the dispatch pipeline.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(
        "Calabash does not support build target '{platform}' (supported: {supported}). \
         Mobile Web support is not available",
        supported = Platform::supported_list()
    )]
    UnsupportedPlatform { platform: String },

    #[error("Invalid Titanium project location: no tiapp.xml in '{path}'")]
    InvalidProject { path: PathBuf },

    #[error("Failed to set up Calabash assets: {0}")]
    Provision(#[from] ProvisionError),

    #[error("No runner registered for '{runner}'")]
    RunnerNotRegistered { runner: String },

    #[error("Invocation context already carries partitioned arguments")]
    ContextAlreadyAttached,

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

impl From<AlreadyAttached> for DispatchError {
    fn from(_: AlreadyAttached) -> Self {
        DispatchError::ContextAlreadyAttached
    }
}

impl DispatchError {
    /// Short machine-readable kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::UnsupportedPlatform { .. } => "unsupported_platform",
            DispatchError::InvalidProject { .. } => "invalid_project",
            DispatchError::Provision(_) => "provisioning_failure",
            DispatchError::RunnerNotRegistered { .. } => "runner_not_registered",
            DispatchError::ContextAlreadyAttached => "context_already_attached",
            DispatchError::Runner(_) => "runner_error",
        }
    }
}
