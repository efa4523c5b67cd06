//! BLAKE3 content hashing
//!
//! Used to tell whether an existing target already matches the canonical copy
//! and whether a canonical copy has drifted from its source.

use std::fs::File;
use std::io;
use std::path::Path;

use blake3::Hasher;
use walkdir::WalkDir;

use crate::error::{Result, read_failed};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

fn feed_file(hasher: &mut Hasher, path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| read_failed(path, &e))?;
    io::copy(&mut file, hasher).map_err(|e| read_failed(path, &e))?;
    Ok(())
}

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    feed_file(&mut hasher, path)?;
    Ok(format!("{HASH_PREFIX}{}", hasher.finalize().to_hex()))
}

/// Calculate BLAKE3 hash of a directory's contents
///
/// Files are visited in sorted order and each contributes its relative path
/// (forward slashes) and content, so renames change the hash. `.git` is skipped.
pub fn hash_directory(path: &Path) -> Result<String> {
    let mut files: Vec<_> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();

    let mut hasher = Hasher::new();
    for file_path in files {
        let relative = file_path.strip_prefix(path).unwrap_or(&file_path);
        hasher.update(crate::path_utils::to_forward_slashes(relative).as_bytes());
        hasher.update(b"\0");
        feed_file(&mut hasher, &file_path)?;
        hasher.update(b"\0");
    }

    Ok(format!("{HASH_PREFIX}{}", hasher.finalize().to_hex()))
}

/// Hash a file or a directory, following symlinks
pub fn hash_path(path: &Path) -> Result<String> {
    if path.is_dir() {
        hash_directory(path)
    } else {
        hash_file(path)
    }
}

/// True when both paths exist and hold identical content
pub fn same_content(a: &Path, b: &Path) -> bool {
    if !a.exists() || !b.exists() || a.is_dir() != b.is_dir() {
        return false;
    }
    matches!((hash_path(a), hash_path(b)), (Ok(x), Ok(y)) if x == y)
}
