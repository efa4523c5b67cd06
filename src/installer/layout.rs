//! On-disk layout of an install scope
//!
//! ```text
//! <base>/
//! ├── .agents/                    # canonical root
//! │   ├── agents/<name>.md
//! │   ├── skills/<name>/
//! │   ├── commands/<name>.md
//! │   ├── backups/                # replaced targets
//! │   ├── install-state.json
//! │   └── .lock
//! ├── .claude/{agents,skills,commands}/...
//! ├── .cursor/{agents,skills,commands}/...
//! └── .<group>/                   # file groups
//! ```

use std::path::{Path, PathBuf};

use crate::domain::{ComponentKind, Scope, Tool};
use crate::error::{AgntxError, Result};

pub const CANONICAL_DIR: &str = ".agents";
pub const BACKUPS_DIR: &str = "backups";
const LOCK_FILE: &str = ".lock";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub scope: Scope,
    pub base_dir: PathBuf,
    pub canonical_root: PathBuf,
}

impl Layout {
    pub fn new(scope: Scope, base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            scope,
            canonical_root: base_dir.join(CANONICAL_DIR),
            base_dir,
        }
    }

    /// Pick the base directory for `scope`.
    ///
    /// `path` is only used (and then required) for [`Scope::Path`]; relative
    /// paths are taken from `workspace`.
    pub fn resolve(
        scope: Scope,
        path: Option<&Path>,
        home_dir: &Path,
        workspace: &Path,
    ) -> Result<Self> {
        let base = match scope {
            Scope::Global => home_dir.to_path_buf(),
            Scope::Local => workspace.to_path_buf(),
            Scope::Path => workspace.join(path.ok_or(AgntxError::MissingScopePath)?),
        };
        Ok(Self::new(scope, crate::path_utils::lexical_normalize(&base)))
    }

    pub fn canonical_dir(&self, kind: ComponentKind) -> PathBuf {
        self.canonical_root.join(kind.as_str())
    }

    pub fn canonical_path(&self, kind: ComponentKind, name: &str) -> PathBuf {
        self.canonical_dir(kind).join(kind.entry_name(name))
    }

    pub fn tool_dir(&self, tool: Tool) -> PathBuf {
        self.base_dir.join(tool.dir_name())
    }

    pub fn tool_path(&self, tool: Tool, kind: ComponentKind, name: &str) -> PathBuf {
        self.tool_dir(tool)
            .join(kind.as_str())
            .join(kind.entry_name(name))
    }

    pub fn file_group_path(&self, group: &str) -> PathBuf {
        self.base_dir.join(format!(".{group}"))
    }

    /// A file group whose `.<group>` directory is not a tool directory or the
    /// canonical root
    pub fn is_group_name_allowed(group: &str) -> bool {
        let dotted = format!(".{group}");
        !group.is_empty()
            && !group.contains(['/', '\\'])
            && group != "."
            && group != ".."
            && dotted != CANONICAL_DIR
            && Tool::ALL.iter().all(|tool| dotted != tool.dir_name())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.canonical_root.join(crate::manifest::MANIFEST_FILE)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.canonical_root.join(BACKUPS_DIR)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.canonical_root.join(LOCK_FILE)
    }
}
