//! Basic file operations for installation
//!
//! - Directory creation (`ensure_parent_dir`)
//! - Copying files and directory trees
//! - Creating typed symlinks with relative values

use std::io;
use std::path::Path;

use crate::common::fs::{CopyOptions, copy_dir_recursive};
use crate::error::{Result, write_failed};

/// Ensure parent directory exists for a path
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_failed(parent, &e))?;
    }
    Ok(())
}

/// Copy a file or a directory tree (without `.git`) to `target`
pub fn copy_entry(source: &Path, target: &Path, is_dir: bool) -> Result<()> {
    ensure_parent_dir(target)?;
    if is_dir {
        copy_dir_recursive(source, target, &CopyOptions::exclude_git())
            .map_err(|e| write_failed(target, &e))
    } else {
        std::fs::copy(source, target)
            .map(|_| ())
            .map_err(|e| write_failed(target, &e))
    }
}

/// Link `target` to `source` with a value relative to the target's parent
pub fn link_entry(source: &Path, target: &Path, is_dir: bool) -> Result<()> {
    ensure_parent_dir(target)?;
    let parent = target.parent().unwrap_or(target);
    let value = crate::path_utils::relative_path(parent, source);
    create_symlink(&value, target, is_dir).map_err(|e| write_failed(target, &e))
}

/// Create a symlink at `at` holding `link_value`
#[cfg(unix)]
pub fn create_symlink(link_value: &Path, at: &Path, _is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(link_value, at)
}

/// Create a symlink at `at` holding `link_value`. Windows links are typed.
#[cfg(windows)]
pub fn create_symlink(link_value: &Path, at: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        std::os::windows::fs::symlink_dir(link_value, at)
    } else {
        std::os::windows::fs::symlink_file(link_value, at)
    }
}
