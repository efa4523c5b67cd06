//! Advisory file locks
//!
//! A [`DirLock`] serializes concurrent agntx processes working on the same
//! canonical root or the same cached repository. The lock is held until the
//! guard is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use fslock::LockFile;

use crate::error::{AgntxError, Result};

#[derive(Debug)]
pub struct DirLock {
    lock: LockFile,
    lock_path: PathBuf,
}

impl DirLock {
    /// Block until the lock at `lock_path` is acquired, creating parents as needed
    pub fn acquire(lock_path: &Path) -> Result<Self> {
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| lock_failed(lock_path, &e.to_string()))?;
        }

        let mut lock =
            LockFile::open(lock_path).map_err(|e| lock_failed(lock_path, &e.to_string()))?;

        if !lock
            .try_lock()
            .map_err(|e| lock_failed(lock_path, &e.to_string()))?
        {
            tracing::info!(path = %lock_path.display(), "waiting for another agntx process");
            lock.lock()
                .map_err(|e| lock_failed(lock_path, &e.to_string()))?;
        }

        tracing::debug!(path = %lock_path.display(), "lock acquired");
        Ok(Self {
            lock,
            lock_path: lock_path.to_path_buf(),
        })
    }
}

fn lock_failed(path: &Path, reason: &str) -> AgntxError {
    AgntxError::LockFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
        // Recreated on next acquire
        let _ = fs::remove_file(&self.lock_path);
    }
}
