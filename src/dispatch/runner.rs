//! Platform runners — the collaborators that perform the native build.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::config::RunnersConfig;
use crate::dispatch::context::InvocationContext;
use crate::dispatch::Platform;
use crate::project::ProjectContext;

/// Environment variables set for script runners.
pub const ENV_PROJECT_DIR: &str = "TICALABASH_PROJECT_DIR";
pub const ENV_PLATFORM: &str = "TICALABASH_PLATFORM";
pub const ENV_CONTEXT: &str = "TICALABASH_CONTEXT";

/// Errors raised while handing off to a runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to start runner '{path}': {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode invocation context: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Runner '{runner}' was terminated by a signal")]
    Terminated { runner: String },
}

/// Everything a runner gets to see.
#[derive(Debug, Clone, Copy)]
pub struct RunRequest<'a> {
    pub runner: &'a str,
    pub project: &'a ProjectContext,
    pub context: &'a InvocationContext,
}

/// Completion signal from a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_code: i32,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A collaborator that builds one platform.
pub trait PlatformRunner {
    fn run(&self, request: &RunRequest<'_>) -> Result<RunOutcome, RunnerError>;
}

/// Runners keyed by runner name (`run_ios`, `run_android`).
#[derive(Default)]
pub struct RunnerRegistry {
    runners: HashMap<String, Box<dyn PlatformRunner>>,
}

impl RunnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `ScriptRunner` per distinct runner name, paths from config.
    pub fn from_config(config: &RunnersConfig, prefix: Option<&Path>) -> Self {
        let mut registry = Self::new();
        for platform in Platform::ALL {
            let name = platform.runner_name();
            if registry.contains(name) {
                continue;
            }
            let path = config.script_path(name, prefix);
            registry.register(name, ScriptRunner::new(path));
        }
        registry
    }

    pub fn with_runner(mut self, name: &str, runner: impl PlatformRunner + 'static) -> Self {
        self.register(name, runner);
        self
    }

    pub fn register(&mut self, name: &str, runner: impl PlatformRunner + 'static) {
        self.runners.insert(name.to_string(), Box::new(runner));
    }

    pub fn get(&self, name: &str) -> Option<&dyn PlatformRunner> {
        self.runners.get(name).map(|r| r.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.runners.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.runners.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Runs an external helper script.
///
/// The build arguments become the script's argv; the project directory is its
/// working directory. The full invocation context is available as JSON in
/// `TICALABASH_CONTEXT`.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    path: PathBuf,
}

impl ScriptRunner {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn command(&self, request: &RunRequest<'_>) -> Result<Command, RunnerError> {
        let mut cmd = Command::new(&self.path);
        cmd.args(request.context.passthrough_args())
            .current_dir(&request.project.project_dir)
            .env(ENV_PROJECT_DIR, &request.project.project_dir)
            .env(ENV_PLATFORM, request.project.platform.as_str())
            .env(ENV_CONTEXT, request.context.to_json()?);
        Ok(cmd)
    }
}

impl PlatformRunner for ScriptRunner {
    fn run(&self, request: &RunRequest<'_>) -> Result<RunOutcome, RunnerError> {
        tracing::info!(
            runner = request.runner,
            path = %self.path.display(),
            "Handing off to platform runner"
        );

        let status = self
            .command(request)?
            .status()
            .map_err(|source| RunnerError::Spawn {
                path: self.path.clone(),
                source,
            })?;

        match status.code() {
            Some(exit_code) => {
                tracing::debug!(runner = request.runner, exit_code, "Runner finished");
                Ok(RunOutcome { exit_code })
            }
            None => Err(RunnerError::Terminated {
                runner: request.runner.to_string(),
            }),
        }
    }
}
