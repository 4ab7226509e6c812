//! # Per-Request Working Copies
//!
//! Every notification is merged in its own sparse Subversion working copy. The
//! `WorkingCopyManager` creates a private temporary directory, takes the
//! concurrency gate, checks out only the target's parent directory at depth
//! `empty`, and updates the single child that holds the target document.
//!
//! The manager exclusively owns the directory and the lock guard. Both are
//! given up together by `release`, which consumes the `WorkingCopy` so it can
//! run at most once, and never fails: problems deleting the directory are
//! logged and otherwise ignored so they cannot mask the error that ended the
//! transaction. If a `WorkingCopy` is dropped without being released (for
//! example while unwinding), `TempDir` and `SystemLock` clean up on drop.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rand::distr::Alphanumeric;
use rand::Rng;
use tempfile::{Builder, TempDir};

use crate::config::Config;
use crate::defaults;
use crate::error::{Error, Result};
use crate::lock::{ConcurrencyGate, SystemLock};
use crate::path::TargetPath;
use crate::repository::SvnOperations;

/// Random characters appended to the prefix of a working directory name.
const TEMP_NAME_LEN: usize = 10;

/// A temporary working copy and the lock that guards it.
#[derive(Debug)]
pub struct WorkingCopy {
    temp_dir: Option<TempDir>,
    root: PathBuf,
    checkout_path: Option<PathBuf>,
    lock: Option<SystemLock>,
}

impl WorkingCopy {
    /// The temporary directory, which is also the working copy root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The target document, once checked out.
    pub fn checkout_path(&self) -> Option<&Path> {
        self.checkout_path.as_deref()
    }

    /// Whether this working copy currently holds the concurrency gate.
    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }
}

/// Creates, populates and destroys working copies.
pub struct WorkingCopyManager<'a> {
    svn: &'a dyn SvnOperations,
    gate: ConcurrencyGate,
    temp_root: PathBuf,
    attempts: u32,
    url_base: String,
    index_document: String,
}

impl<'a> WorkingCopyManager<'a> {
    pub fn new(svn: &'a dyn SvnOperations, config: &Config) -> Result<Self> {
        Ok(Self {
            svn,
            gate: ConcurrencyGate::new(config.lock_path()?),
            temp_root: config.temp_root(),
            attempts: config.temp_attempts.max(1),
            url_base: config.svn_url_base.clone(),
            index_document: config.index_document.clone(),
        })
    }

    /// Create a private temporary directory, then take the concurrency gate.
    pub fn acquire(&self) -> Result<WorkingCopy> {
        let temp_dir = create_temp_dir(&self.temp_root, self.attempts)?;
        let root = temp_dir.path().to_path_buf();
        debug!("created working copy directory {}", root.display());

        let lock = match self.gate.acquire() {
            Ok(lock) => lock,
            Err(e) => {
                remove_temp_dir(temp_dir);
                return Err(e);
            }
        };

        Ok(WorkingCopy {
            temp_dir: Some(temp_dir),
            root,
            checkout_path: None,
            lock: Some(lock),
        })
    }

    /// Check out the target's parent at depth `empty` and update the target.
    ///
    /// Returns the path of the document to merge into. A target naming a
    /// directory resolves to its index document.
    pub fn checkout(
        &self,
        working_copy: &mut WorkingCopy,
        target: &TargetPath,
    ) -> Result<PathBuf> {
        let url = crate::svn::repository_url(&self.url_base, &target.parent);
        self.svn.checkout_empty(&url, working_copy.root())?;

        let child = working_copy.root().join(target.leaf());
        self.svn.update(&child, target.is_directory())?;

        let document = if child.is_dir() {
            if !target.is_directory() {
                self.svn.update(&child, true)?;
            }
            child.join(&self.index_document)
        } else {
            child
        };

        if !document.is_file() {
            return Err(Error::InvalidTarget {
                message: format!("Target does not exist: {}", target.full_path()),
            });
        }

        working_copy.checkout_path = Some(document.clone());
        Ok(document)
    }

    /// Delete the working copy and release the gate.
    pub fn release(&self, mut working_copy: WorkingCopy) {
        if let Some(temp_dir) = working_copy.temp_dir.take() {
            remove_temp_dir(temp_dir);
        }
        if let Some(lock) = working_copy.lock.take() {
            lock.release();
        }
    }
}

/// Create a uniquely named directory with owner-only permissions.
///
/// Each attempt is a single `mkdir` of a freshly drawn name. Name collisions
/// are retried up to `attempts` times. Any other failure, such as a missing
/// or read-only root, ends the search immediately.
fn create_temp_dir(temp_root: &Path, attempts: u32) -> Result<TempDir> {
    create_temp_dir_with(temp_root, attempts, random_name)
}

fn random_name() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(TEMP_NAME_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", defaults::TEMP_PREFIX, suffix)
}

fn create_temp_dir_with<F>(temp_root: &Path, attempts: u32, mut next_name: F) -> Result<TempDir>
where
    F: FnMut() -> String,
{
    let mut last_error = None;
    for _ in 0..attempts {
        let name = next_name();
        match Builder::new()
            .prefix(&name)
            .rand_bytes(0)
            .tempdir_in(temp_root)
        {
            Ok(dir) => {
                restrict_permissions(dir.path())?;
                return Ok(dir);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_error = Some(e),
            Err(e) => {
                return Err(Error::ResourceExhausted {
                    message: format!("{}: {}", temp_root.display(), e),
                })
            }
        }
    }

    Err(Error::ResourceExhausted {
        message: format!(
            "{}: no unused name after {} attempts{}",
            temp_root.display(),
            attempts,
            last_error.map(|e| format!(" ({})", e)).unwrap_or_default()
        ),
    })
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700)).map_err(|e| {
        Error::ResourceExhausted {
            message: format!("{}: {}", path.display(), e),
        }
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

fn remove_temp_dir(temp_dir: TempDir) {
    let path = temp_dir.path().to_path_buf();
    match temp_dir.close() {
        Ok(()) => debug!("removed working copy directory {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            "failed to remove working copy directory {}: {}",
            path.display(),
            e
        ),
    }
}
