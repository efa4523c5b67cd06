//! Error types and handling for agntx
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! Per-item install failures and integrity drift are not errors: they are
//! counted or reported as [`crate::domain::Issue`]s. Everything here is fatal
//! for the current command.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for agntx operations
#[derive(Error, Diagnostic, Debug)]
pub enum AgntxError {
    // Source errors
    #[error("Invalid source '{input}': {reason}")]
    #[diagnostic(
        code(agntx::source::invalid),
        help(
            "Valid formats: ./local/path, owner/repo, owner/repo#ref, owner/repo/<alias>, \
             https://host/owner/repo[/<alias>][#ref], git@host:owner/repo.git"
        )
    )]
    InvalidSource { input: String, reason: String },

    #[error("Unknown source alias '{alias}' in '{input}' (known aliases: {known})")]
    #[diagnostic(code(agntx::source::unknown_alias))]
    UnknownAlias {
        input: String,
        alias: String,
        known: String,
    },

    #[error("Source directory not found: {path}")]
    #[diagnostic(code(agntx::source::not_found))]
    SourceNotFound { path: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(agntx::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(agntx::git::clone_failed),
        help("Check that the URL is correct and you have access to the repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to fetch {url}: {reason}")]
    #[diagnostic(code(agntx::git::fetch_failed))]
    GitFetchFailed { url: String, reason: String },

    #[error("Failed to resolve git ref '{git_ref}': {reason}")]
    #[diagnostic(code(agntx::git::ref_resolve_failed))]
    GitRefResolveFailed { git_ref: String, reason: String },

    #[error("Failed to checkout commit '{sha}': {reason}")]
    #[diagnostic(code(agntx::git::checkout_failed))]
    GitCheckoutFailed { sha: String, reason: String },

    #[error("Failed to open repository at '{path}': {reason}")]
    #[diagnostic(code(agntx::git::open_failed))]
    GitOpenFailed { path: String, reason: String },

    // Selection errors
    #[error("Unknown {kind}: {invalid} (available: {available})")]
    #[diagnostic(
        code(agntx::selection::invalid_names),
        help("Run 'agntx inspect <source>' to list what the source provides")
    )]
    InvalidSelection {
        kind: String,
        invalid: String,
        available: String,
    },

    #[error("{message}")]
    #[diagnostic(code(agntx::selection::required))]
    SelectionRequired { message: String },

    // Install errors
    #[error("Symlink mode is not supported on {platform}")]
    #[diagnostic(
        code(agntx::install::symlink_unsupported),
        help("Re-run with '--mode copy' to install regular file copies instead")
    )]
    SymlinkUnsupported { platform: String },

    #[error("No install state found under {path}")]
    #[diagnostic(
        code(agntx::manifest::not_found),
        help("Run 'agntx install <source>' first, or pass the same --scope/--path used to install")
    )]
    ManifestNotFound { path: String },

    #[error("Failed to lock {path}: {reason}")]
    #[diagnostic(
        code(agntx::lock::failed),
        help("Another agntx process may be running against the same directory")
    )]
    LockFailed { path: String, reason: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(agntx::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    #[diagnostic(code(agntx::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("--path is required when --scope path is used")]
    #[diagnostic(code(agntx::config::missing_path))]
    MissingScopePath,

    #[error("Could not determine {what} directory")]
    #[diagnostic(
        code(agntx::config::no_directory),
        help("Set AGNTX_HOME or AGNTX_CACHE_DIR explicitly")
    )]
    NoDirectory { what: String },

    // Prompt errors
    #[error("Prompt failed: {message}")]
    #[diagnostic(code(agntx::prompt::failed))]
    PromptFailed { message: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(agntx::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(agntx::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(agntx::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(agntx::fs::io_error))]
    IoError { message: String },

    // Cache errors
    #[error("Cache operation failed: {message}")]
    #[diagnostic(code(agntx::cache::operation_failed))]
    CacheOperationFailed { message: String },
}

impl From<std::io::Error> for AgntxError {
    fn from(err: std::io::Error) -> Self {
        AgntxError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for AgntxError {
    fn from(err: serde_yaml::Error) -> Self {
        AgntxError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AgntxError {
    fn from(err: serde_json::Error) -> Self {
        AgntxError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for AgntxError {
    fn from(err: git2::Error) -> Self {
        AgntxError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for AgntxError {
    fn from(err: inquire::InquireError) -> Self {
        AgntxError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, AgntxError>;

/// Map an io error on `path` into a read failure
pub fn read_failed(path: &std::path::Path, err: &std::io::Error) -> AgntxError {
    AgntxError::FileReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Map an io error on `path` into a write failure
pub fn write_failed(path: &std::path::Path, err: &std::io::Error) -> AgntxError {
    AgntxError::FileWriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_code() {
        let err = AgntxError::InvalidSource {
            input: "???".to_string(),
            reason: "bad".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("agntx::source::invalid".to_string())
        );
    }

    test_error_contains!(
        test_invalid_selection_lists_names,
        AgntxError::InvalidSelection {
            kind: "agents".to_string(),
            invalid: "ghost".to_string(),
            available: "a, b".to_string(),
        },
        "ghost",
        "a, b"
    );

    test_error_contains!(
        test_unknown_alias_lists_known,
        AgntxError::UnknownAlias {
            input: "owner/repo/nope".to_string(),
            alias: "nope".to_string(),
            known: "agents, claude, cursor".to_string(),
        },
        "nope",
        "claude"
    );

    #[test]
    fn test_symlink_unsupported_has_remediation() {
        let err = AgntxError::SymlinkUnsupported {
            platform: "windows".to_string(),
        };
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("--mode copy"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AgntxError = io_err.into();
        assert!(matches!(err, AgntxError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid json content");
        let err: AgntxError = parse_result.unwrap_err().into();
        assert!(matches!(err, AgntxError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_git_error_conversion() {
        let err: AgntxError = git2::Error::from_str("git error").into();
        assert!(matches!(err, AgntxError::GitOperationFailed { .. }));
    }
}
