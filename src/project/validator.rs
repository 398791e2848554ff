use std::path::Path;

use crate::project::TIAPP_XML;

/// Outcome of checking a project directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
}

/// A directory is a Titanium project iff `tiapp.xml` exists directly in it.
pub fn validate(project_dir: &Path) -> ValidationResult {
    ValidationResult {
        valid: project_dir.join(TIAPP_XML).exists(),
    }
}
