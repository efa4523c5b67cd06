//! Friendlier messages for libgit2 errors

use git2::{Error, ErrorClass};

/// Interpret a git2 error into a short user-facing reason
pub fn interpret_git_error(err: &Error) -> String {
    let message = err.message().to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

    if has(&["not found", "404", "too many redirects", "authentication replays"]) {
        return "Repository not found".to_string();
    }
    if has(&["authentication", "credentials"]) {
        return "Authentication failed".to_string();
    }
    if has(&["permission denied", "access denied"]) {
        return "Permission denied".to_string();
    }
    if has(&["connection", "network", "timeout", "timed out", "resolve host"]) {
        return "Network error".to_string();
    }

    match err.class() {
        ErrorClass::Http if has(&["certificate"]) => "Certificate error".to_string(),
        ErrorClass::Http | ErrorClass::Ssl if has(&["ssl"]) => "SSL error".to_string(),
        ErrorClass::Http => format!("HTTP error: {}", err.message()),
        ErrorClass::Ssh => format!("SSH error: {}", err.message()),
        _ => err.message().to_string(),
    }
}
