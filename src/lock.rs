//! Commit serialization across request handlers.
//!
//! Uses advisory file locks (`flock(2)` on Unix) via the `fs2` crate, so every
//! process serving notifications for the same repository root contends on the
//! same file. The OS releases the lock if a handler crashes, so no stale lock
//! detection is needed.
//!
//! The lock is not reentrant. A handler takes it once per notification and
//! must not process another notification while holding it.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::debug;

use crate::error::{Error, Result};

/// Named exclusive lock shared by every handler of one repository root.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    path: PathBuf,
}

/// Held gate. Dropping it releases the lock.
#[derive(Debug)]
pub struct SystemLock {
    file: File,
    path: PathBuf,
}

impl ConcurrencyGate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the lock is held.
    ///
    /// There is no timeout; request-level timeouts upstream bound the wait.
    pub fn acquire(&self) -> Result<SystemLock> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| self.unavailable(e))?;

        debug!("waiting for lock {}", self.path.display());
        file.lock_exclusive().map_err(|e| self.unavailable(e))?;
        debug!("acquired lock {}", self.path.display());

        Ok(SystemLock {
            file,
            path: self.path.clone(),
        })
    }

    fn unavailable(&self, err: std::io::Error) -> Error {
        Error::LockUnavailable {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl SystemLock {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release explicitly. Equivalent to dropping the guard.
    pub fn release(self) {}
}

impl Drop for SystemLock {
    fn drop(&mut self) {
        // Closing the handle releases the flock as well.
        let _ = self.file.unlock();
        debug!("released lock {}", self.path.display());
    }
}
