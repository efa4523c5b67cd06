//! Symlink capability
//!
//! Symlink mode is checked once, before anything is written. Unix always
//! supports it; Windows needs developer mode or elevated rights, so it is
//! probed in a scratch directory.

use crate::domain::InstallMode;
use crate::error::{AgntxError, Result};

#[cfg(unix)]
pub fn symlinks_supported() -> bool {
    true
}

#[cfg(windows)]
pub fn symlinks_supported() -> bool {
    let Ok(dir) = tempfile::tempdir() else {
        return false;
    };
    let target = dir.path().join("target");
    if std::fs::write(&target, b"").is_err() {
        return false;
    }
    std::os::windows::fs::symlink_file(&target, dir.path().join("link")).is_ok()
}

/// Default mode when neither flag nor config picks one
pub fn default_mode() -> InstallMode {
    if symlinks_supported() {
        InstallMode::Symlink
    } else {
        InstallMode::Copy
    }
}

/// Fail early when symlink mode was asked for but cannot work here
pub fn ensure_supported(mode: InstallMode) -> Result<()> {
    if mode == InstallMode::Symlink && !symlinks_supported() {
        return Err(AgntxError::SymlinkUnsupported {
            platform: std::env::consts::OS.to_string(),
        });
    }
    Ok(())
}
