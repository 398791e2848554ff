//! First-run provisioning of the Calabash feature assets.
//!
//! Both assets are staged in a temporary directory inside the project and moved
//! into place at the end; `features/` is moved last because its presence is
//! what marks a project as provisioned. A failure at any step leaves no
//! `features/` directory behind, so the next run starts over.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::project::{CUCUMBER_YML, FEATURES_DIR, LOCK_FILE};

/// Errors that can occur while provisioning a project.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Template '{path}' not found")]
    MissingTemplate { path: PathBuf },

    #[error("Failed to lock '{path}': {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create staging directory in '{path}': {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy '{from}' to '{to}': {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install '{path}': {source}")]
    Install {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Template locations the provisioner copies from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTemplates {
    pub features_dir: PathBuf,
    pub config_file: PathBuf,
}

impl AssetTemplates {
    /// Templates laid out as `<dir>/features/` and `<dir>/cucumber.yml`.
    pub fn from_assets_dir(dir: &Path) -> Self {
        Self {
            features_dir: dir.join(FEATURES_DIR),
            config_file: dir.join(CUCUMBER_YML),
        }
    }

    /// Both templates must exist before anything is written.
    pub fn check(&self) -> Result<(), ProvisionError> {
        if !self.features_dir.is_dir() {
            return Err(ProvisionError::MissingTemplate {
                path: self.features_dir.clone(),
            });
        }
        if !self.config_file.is_file() {
            return Err(ProvisionError::MissingTemplate {
                path: self.config_file.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// `features/` already existed; nothing was written.
    AlreadyProvisioned,
    /// Assets were installed.
    Provisioned { files_copied: usize },
}

/// Exclusive advisory lock on the project's lock file, released on drop.
struct ProvisionLock {
    _file: File,
}

impl ProvisionLock {
    fn acquire(project_dir: &Path) -> Result<Self, ProvisionError> {
        let path = project_dir.join(LOCK_FILE);
        let lock_err = |source| ProvisionError::Lock {
            path: path.clone(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(lock_err)?;
        FileExt::lock_exclusive(&file).map_err(lock_err)?;

        Ok(Self { _file: file })
    }
}

/// Install the Calabash templates into `project_dir` unless `features/` exists.
pub fn ensure_provisioned(
    project_dir: &Path,
    templates: &AssetTemplates,
) -> Result<ProvisionOutcome, ProvisionError> {
    let features = project_dir.join(FEATURES_DIR);
    if features.exists() {
        tracing::info!("{}/ already present, leaving it untouched", FEATURES_DIR);
        return Ok(ProvisionOutcome::AlreadyProvisioned);
    }

    templates.check()?;
    let _lock = ProvisionLock::acquire(project_dir)?;

    // Another invocation may have finished while we waited for the lock.
    if features.exists() {
        tracing::info!("{}/ provisioned concurrently, nothing to do", FEATURES_DIR);
        return Ok(ProvisionOutcome::AlreadyProvisioned);
    }

    tracing::info!("{}/ dir not present, setting one up", FEATURES_DIR);

    let staging = tempfile::Builder::new()
        .prefix(".ticalabash-")
        .tempdir_in(project_dir)
        .map_err(|source| ProvisionError::Stage {
            path: project_dir.to_path_buf(),
            source,
        })?;

    let staged_features = staging.path().join(FEATURES_DIR);
    let mut files_copied = copy_dir_recursive(&templates.features_dir, &staged_features)?;

    let staged_config = staging.path().join(CUCUMBER_YML);
    fs::copy(&templates.config_file, &staged_config).map_err(|source| ProvisionError::Copy {
        from: templates.config_file.clone(),
        to: staged_config.clone(),
        source,
    })?;
    files_copied += 1;
    tracing::debug!("{} taken from {}", CUCUMBER_YML, templates.config_file.display());

    install(&staged_config, &project_dir.join(CUCUMBER_YML))?;
    install(&staged_features, &features)?;

    tracing::info!(
        files_copied,
        "Features directory created and {} is set",
        CUCUMBER_YML
    );
    Ok(ProvisionOutcome::Provisioned { files_copied })
}

fn install(staged: &Path, target: &Path) -> Result<(), ProvisionError> {
    fs::rename(staged, target).map_err(|source| ProvisionError::Install {
        path: target.to_path_buf(),
        source,
    })
}

/// Copy `src` into `dest` recursively, returning the number of files copied.
fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<usize, ProvisionError> {
    let copy_err = |source| ProvisionError::Copy {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    };

    fs::create_dir_all(dest).map_err(copy_err)?;

    let mut copied = 0;
    for entry in fs::read_dir(src).map_err(copy_err)? {
        let entry = entry.map_err(copy_err)?;
        let from = entry.path();
        let to = dest.join(entry.file_name());

        if entry.file_type().map_err(copy_err)?.is_dir() {
            copied += copy_dir_recursive(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|source| ProvisionError::Copy {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}
