//! Cross-platform path utilities
//!
//! Sanitized names for cache keys and backups, relative link values for
//! symlinks, and containment checks that hold up when the path does not
//! exist yet.

use std::path::{Component, Path, PathBuf};

use normpath::PathExt;

/// Characters that are unsafe in filesystem paths
/// Replaced with hyphens and collapsed: `/`, `\`, `:`, `*`, `?`, `"`, `<`, `>`, `|`
const PATH_UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Render a path with forward slashes regardless of platform
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a name safe for filesystem use.
///
/// Replaces unsafe characters with hyphens, collapses consecutive hyphens and
/// trims them from both ends. `owner/repo` becomes `owner-repo`. Returns
/// "unknown" if nothing is left.
pub fn make_path_safe(name: &str) -> String {
    let key: String = name
        .trim_start_matches('@')
        .chars()
        .map(|c| if PATH_UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect();

    let key = key
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if key.is_empty() {
        "unknown".to_string()
    } else {
        key
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Normalize a path that may not exist yet.
///
/// The longest existing ancestor is resolved through `normpath` (so `/var` and
/// `/private/var` on macOS compare equal) and the missing tail is appended.
pub fn normalize(path: &Path) -> PathBuf {
    let path = lexical_normalize(path);
    if let Ok(norm) = path.normalize() {
        return norm.into_path_buf();
    }

    let mut current = path.as_path();
    let mut tail = Vec::new();
    while !current.exists() {
        match (current.file_name(), current.parent()) {
            (Some(name), Some(parent)) => {
                tail.push(name.to_os_string());
                current = parent;
            }
            _ => return path.clone(),
        }
    }

    let mut base = current
        .normalize()
        .map_or_else(|_| current.to_path_buf(), normpath::BasePathBuf::into_path_buf);
    for name in tail.iter().rev() {
        base.push(name);
    }
    base
}

/// True when `path` lies strictly below `root` after normalization.
///
/// `root` itself is not below `root`.
pub fn is_strictly_within(path: &Path, root: &Path) -> bool {
    let path = normalize(path);
    let root = normalize(root);
    path != root && path.starts_with(&root)
}

/// Relative path from directory `from_dir` to `to`.
///
/// Both are normalized first. Used for symlink values so that a link keeps
/// working when the whole base directory is moved.
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from = normalize(from_dir);
    let to = normalize(to);

    let from_parts: Vec<_> = from.components().collect();
    let to_parts: Vec<_> = to.components().collect();
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    // Different roots (e.g. another drive letter): no relative form exists
    if common == 0 {
        return to;
    }

    let mut rel = PathBuf::new();
    for _ in common..from_parts.len() {
        rel.push("..");
    }
    for part in &to_parts[common..] {
        rel.push(part.as_os_str());
    }
    rel
}
