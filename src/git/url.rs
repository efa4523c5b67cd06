//! URL normalization for libgit2

use std::borrow::Cow;

/// Rewrite SCP-style `git@host:path` into `ssh://git@host/path`
pub fn normalize_ssh_url(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") {
        return Cow::Borrowed(url);
    }
    match url.split_once(':') {
        Some((host, path)) => {
            let path = path.strip_prefix('/').unwrap_or(path);
            Cow::Owned(format!("ssh://{host}/{path}"))
        }
        None => Cow::Borrowed(url),
    }
}

/// Make `file://` URLs absolute with forward slashes
pub fn normalize_file_url(url: &str) -> Cow<'_, str> {
    let Some(after) = url.strip_prefix("file://") else {
        return Cow::Borrowed(url);
    };
    let path = after.replace('\\', "/");
    if path.starts_with('/') && path == after {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("file:///{}", path.trim_start_matches('/')))
    }
}

pub fn is_local(url: &str) -> bool {
    url.starts_with("file://") || std::path::Path::new(url).is_absolute()
}
