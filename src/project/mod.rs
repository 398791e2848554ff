//! Titanium project inspection and Calabash asset provisioning.

mod provisioner;
mod validator;

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::dispatch::Platform;

pub use provisioner::{ensure_provisioned, AssetTemplates, ProvisionError, ProvisionOutcome};
pub use validator::{validate, ValidationResult};

/// Project descriptor whose presence marks a Titanium project.
pub const TIAPP_XML: &str = "tiapp.xml";
/// Provisioned feature directory.
pub const FEATURES_DIR: &str = "features";
/// Provisioned Cucumber profile file.
pub const CUCUMBER_YML: &str = "cucumber.yml";
/// Alloy source directory.
pub const ALLOY_APP_DIR: &str = "app";
/// Advisory lock taken while provisioning.
pub const LOCK_FILE: &str = ".ticalabash.lock";

/// Snapshot of one project, taken once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    pub platform: Platform,
    pub project_dir: PathBuf,
    pub has_descriptor: bool,
    pub has_features: bool,
    pub has_alloy_app: bool,
}

impl ProjectContext {
    /// Inspect `project_dir` without modifying it.
    pub fn inspect(platform: Platform, project_dir: &Path) -> Self {
        Self {
            platform,
            project_dir: project_dir.to_path_buf(),
            has_descriptor: validate(project_dir).valid,
            has_features: project_dir.join(FEATURES_DIR).exists(),
            has_alloy_app: project_dir.join(ALLOY_APP_DIR).is_dir(),
        }
    }
}

/// Pick the project directory for this invocation.
///
/// An explicit directory wins. Otherwise `SOURCE_ROOT` (set by Xcode build
/// phases, two levels below the project) is used, then the working directory.
pub fn resolve_project_dir(
    explicit: Option<&Path>,
    source_root: Option<&OsStr>,
    cwd: &Path,
) -> PathBuf {
    let candidate = match (explicit, source_root) {
        (Some(dir), _) => dir.to_path_buf(),
        (None, Some(root)) if !root.is_empty() => Path::new(root).join("..").join(".."),
        _ => PathBuf::from("."),
    };
    normalize(&cwd.join(candidate))
}

/// Lexically fold `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
