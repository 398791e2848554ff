//! Shared test utilities and fake runners.

#![allow(dead_code, unused_imports)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;
use ticalabash::dispatch::{PlatformRunner, RunOutcome, RunRequest, RunnerError, RunnerRegistry};
use ticalabash::project::{AssetTemplates, TIAPP_XML};

pub fn raw_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Templates shipped with the crate.
pub fn bundled_assets() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets")
}

pub fn bundled_templates() -> AssetTemplates {
    AssetTemplates::from_assets_dir(&bundled_assets())
}

/// Empty temp directory, optionally marked as a Titanium project.
pub fn temp_project(with_descriptor: bool) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    if with_descriptor {
        std::fs::write(
            dir.path().join(TIAPP_XML),
            "<?xml version=\"1.0\"?>\n<ti:app xmlns:ti=\"http://ti.appcelerator.org\"/>\n",
        )
        .expect("Failed to write tiapp.xml");
    }
    dir
}

/// What a fake runner saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRun {
    pub runner: String,
    pub platform: String,
    pub project_dir: PathBuf,
    pub test_tool_args: Vec<String>,
    pub passthrough_args: Vec<String>,
}

pub type RunLog = Rc<RefCell<Vec<RecordedRun>>>;

/// Records each call and returns a fixed exit code.
pub struct RecordingRunner {
    log: RunLog,
    exit_code: i32,
}

impl RecordingRunner {
    pub fn new(log: &RunLog, exit_code: i32) -> Self {
        Self {
            log: Rc::clone(log),
            exit_code,
        }
    }
}

impl PlatformRunner for RecordingRunner {
    fn run(&self, request: &RunRequest<'_>) -> Result<RunOutcome, RunnerError> {
        self.log.borrow_mut().push(RecordedRun {
            runner: request.runner.to_string(),
            platform: request.project.platform.to_string(),
            project_dir: request.project.project_dir.clone(),
            test_tool_args: request.context.test_tool_args().to_vec(),
            passthrough_args: request.context.passthrough_args().to_vec(),
        });
        Ok(RunOutcome {
            exit_code: self.exit_code,
        })
    }
}

/// Registry with recording runners for both runner names.
pub fn recording_registry(log: &RunLog) -> RunnerRegistry {
    RunnerRegistry::new()
        .with_runner("run_ios", RecordingRunner::new(log, 0))
        .with_runner("run_android", RecordingRunner::new(log, 0))
}

/// Sorted relative paths of every file under `root`.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    collect(root, root, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).expect("Failed to read dir") {
        let path = entry.expect("Failed to read entry").path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let rel = path.strip_prefix(root).expect("Path outside root");
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}
