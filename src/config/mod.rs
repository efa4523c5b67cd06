//! Configuration for agntx
//!
//! Settings come from three places, later wins:
//! - built-in defaults
//! - `config.yaml` in the user config directory (or `AGNTX_CONFIG`)
//! - command-line flags, applied by the commands themselves
//!
//! Directory overrides (`AGNTX_HOME`, `AGNTX_CACHE_DIR`) are read from the
//! environment here so the rest of the crate never looks at env vars.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{InstallMode, Scope, Tool};
use crate::error::{AgntxError, Result};

const APP_DIR: &str = "agntx";
const CONFIG_FILE: &str = "config.yaml";

pub const ENV_HOME: &str = "AGNTX_HOME";
pub const ENV_CACHE_DIR: &str = "AGNTX_CACHE_DIR";
pub const ENV_CONFIG: &str = "AGNTX_CONFIG";

/// Defaults from `config.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileDefaults {
    pub scope: Option<Scope>,
    pub mode: Option<InstallMode>,
    pub tools: Option<Vec<Tool>>,
    pub strict: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Base directory for the global scope
    pub home_dir: PathBuf,
    /// Root of the git clone cache
    pub cache_dir: PathBuf,
    pub defaults: FileDefaults,
}

impl Settings {
    /// Load settings from the environment and the optional config file
    pub fn load() -> Result<Self> {
        let home_dir = match std::env::var_os(ENV_HOME) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir().ok_or_else(|| AgntxError::NoDirectory {
                what: "home".to_string(),
            })?,
        };

        let cache_dir = match std::env::var_os(ENV_CACHE_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::cache_dir()
                .ok_or_else(|| AgntxError::NoDirectory {
                    what: "cache".to_string(),
                })?
                .join(APP_DIR),
        };

        let defaults = match config_path() {
            Some(path) if path.is_file() => load_defaults(&path)?,
            _ => FileDefaults::default(),
        };

        Ok(Self {
            home_dir,
            cache_dir,
            defaults,
        })
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(ENV_CONFIG) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Parse a config file. An empty file yields the defaults.
pub fn load_defaults(path: &Path) -> Result<FileDefaults> {
    let content = std::fs::read_to_string(path).map_err(|e| AgntxError::ConfigReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    if content.trim().is_empty() {
        return Ok(FileDefaults::default());
    }

    serde_yaml::from_str(&content).map_err(|e| AgntxError::ConfigParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_full() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "scope: global\nmode: copy\ntools: [cursor]\nstrict: true\n",
        )
        .expect("write");

        let defaults = load_defaults(&path).expect("parse");
        assert_eq!(defaults.scope, Some(Scope::Global));
        assert_eq!(defaults.mode, Some(InstallMode::Copy));
        assert_eq!(defaults.tools, Some(vec![Tool::Cursor]));
        assert_eq!(defaults.strict, Some(true));
    }

    #[test]
    fn test_load_defaults_empty_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "\n").expect("write");

        assert_eq!(load_defaults(&path).expect("parse"), FileDefaults::default());
    }

    #[test]
    fn test_load_defaults_rejects_unknown_tool() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "tools: [vim]\n").expect("write");

        let err = load_defaults(&path).unwrap_err();
        assert!(matches!(err, AgntxError::ConfigParseFailed { .. }));
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn test_load_defaults_rejects_unknown_key() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "colour: blue\n").expect("write");

        assert!(load_defaults(&path).is_err());
    }
}
