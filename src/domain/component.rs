//! Component kinds, target tools, scopes and install modes

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The typed resources a source can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Agents,
    Skills,
    Commands,
    Files,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Agents,
        ComponentKind::Skills,
        ComponentKind::Commands,
        ComponentKind::Files,
    ];

    /// Kinds that go through the canonical root and fan out to tools
    pub const TYPED: [ComponentKind; 3] = [
        ComponentKind::Agents,
        ComponentKind::Skills,
        ComponentKind::Commands,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Agents => "agents",
            ComponentKind::Skills => "skills",
            ComponentKind::Commands => "commands",
            ComponentKind::Files => "files",
        }
    }

    /// Singular label for messages ("agent", "skill", ...)
    pub fn singular(self) -> &'static str {
        match self {
            ComponentKind::Agents => "agent",
            ComponentKind::Skills => "skill",
            ComponentKind::Commands => "command",
            ComponentKind::Files => "file group",
        }
    }

    pub fn is_typed(self) -> bool {
        self != ComponentKind::Files
    }

    /// Skills are directories, agents and commands are single markdown files
    pub fn is_directory(self) -> bool {
        matches!(self, ComponentKind::Skills | ComponentKind::Files)
    }

    /// File name of a component under its kind directory
    pub fn entry_name(self, name: &str) -> String {
        if self.is_directory() {
            name.to_string()
        } else {
            format!("{name}.md")
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI coding tools agntx installs into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Claude,
    Cursor,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::Claude, Tool::Cursor];

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Claude => "claude",
            Tool::Cursor => "cursor",
        }
    }

    /// Directory name under the scope base (`.claude`, `.cursor`)
    pub fn dir_name(self) -> &'static str {
        match self {
            Tool::Claude => ".claude",
            Tool::Cursor => ".cursor",
        }
    }

    /// Fixed support matrix: every tool takes the typed kinds, none takes file groups
    pub fn supports(self, kind: ComponentKind) -> bool {
        kind.is_typed()
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an install lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// User home directory
    Global,
    /// Current project (workspace) directory
    Local,
    /// Explicit `--path` directory
    Path,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Local => "local",
            Scope::Path => "path",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How tool targets are materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InstallMode {
    Copy,
    Symlink,
}

impl InstallMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InstallMode::Copy => "copy",
            InstallMode::Symlink => "symlink",
        }
    }
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_support_matrix() {
        for tool in Tool::ALL {
            assert!(tool.supports(ComponentKind::Agents));
            assert!(tool.supports(ComponentKind::Skills));
            assert!(tool.supports(ComponentKind::Commands));
            assert!(!tool.supports(ComponentKind::Files));
        }
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(ComponentKind::Agents.entry_name("reviewer"), "reviewer.md");
        assert_eq!(ComponentKind::Commands.entry_name("ship"), "ship.md");
        assert_eq!(ComponentKind::Skills.entry_name("pdf"), "pdf");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ComponentKind::Commands).unwrap(),
            "\"commands\""
        );
        assert_eq!(serde_json::to_string(&Tool::Cursor).unwrap(), "\"cursor\"");
        assert_eq!(
            serde_json::from_str::<InstallMode>("\"symlink\"").unwrap(),
            InstallMode::Symlink
        );
    }

    #[test]
    fn test_tool_dir_names() {
        assert_eq!(Tool::Claude.dir_name(), ".claude");
        assert_eq!(Tool::Cursor.dir_name(), ".cursor");
    }
}
