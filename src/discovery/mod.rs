//! Convention-based source discovery
//!
//! A source directory is classified by its top-level layout:
//!
//! ```text
//! <root>/
//! ├── agents/*.md          # agents (file stem is the name)
//! ├── skills/<name>/SKILL.md
//! ├── commands/*.md
//! ├── <group>/             # any other visible directory is a file group
//! └── docs/, tests/, ...   # reserved names are skipped and reported
//! ```
//!
//! [`discover`] only classifies. [`validate`] layers the structural checks on
//! top and [`inspect`] does both.

pub mod agent;
pub mod frontmatter;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{ComponentKind, Issue, IssueCode};
use crate::error::{AgntxError, Result};
use crate::installer::layout::Layout;

pub const SKILL_MARKER: &str = "SKILL.md";

/// Top-level directories never treated as file groups
pub const RESERVED_DIRS: &[&str] = &[
    "rules",
    "settings",
    "src",
    "lib",
    "dist",
    "build",
    "coverage",
    "node_modules",
    "test",
    "tests",
    "__tests__",
    "docs",
    "examples",
    "config",
    "tmp",
    "temp",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredSource {
    pub root_dir: PathBuf,
    pub agents: Vec<String>,
    pub skills: Vec<String>,
    pub commands: Vec<String>,
    pub file_groups: Vec<String>,
    pub reserved_ignored: Vec<String>,
    pub issues: Vec<Issue>,
}

impl DiscoveredSource {
    pub fn names(&self, kind: ComponentKind) -> &[String] {
        match kind {
            ComponentKind::Agents => &self.agents,
            ComponentKind::Skills => &self.skills,
            ComponentKind::Commands => &self.commands,
            ComponentKind::Files => &self.file_groups,
        }
    }

    /// Where a discovered component lives inside the source
    pub fn source_path(&self, kind: ComponentKind, name: &str) -> PathBuf {
        match kind {
            ComponentKind::Files => self.root_dir.join(name),
            _ => self.root_dir.join(kind.as_str()).join(kind.entry_name(name)),
        }
    }

    pub fn is_empty(&self) -> bool {
        ComponentKind::ALL.iter().all(|k| self.names(*k).is_empty())
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn dir_entries(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut out: Vec<(String, PathBuf)> = entries
        .filter_map(std::result::Result::ok)
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            (!is_hidden(&name)).then(|| (name, e.path()))
        })
        .collect();
    out.sort();
    out
}

fn markdown_stems(dir: &Path) -> Vec<String> {
    dir_entries(dir)
        .into_iter()
        .filter(|(_, path)| path.is_file())
        .filter_map(|(name, _)| name.strip_suffix(".md").map(str::to_string))
        .filter(|stem| !stem.is_empty())
        .collect()
}

fn skill_dirs(root: &Path) -> Vec<(String, PathBuf)> {
    dir_entries(&root.join(ComponentKind::Skills.as_str()))
        .into_iter()
        .filter(|(_, path)| path.is_dir())
        .collect()
}

/// Classify a source directory. Fails only when `root` is not a directory.
pub fn discover(root: &Path) -> Result<DiscoveredSource> {
    if !root.is_dir() {
        return Err(AgntxError::SourceNotFound {
            path: root.display().to_string(),
        });
    }

    let mut discovered = DiscoveredSource {
        root_dir: root.to_path_buf(),
        agents: markdown_stems(&root.join(ComponentKind::Agents.as_str())),
        commands: markdown_stems(&root.join(ComponentKind::Commands.as_str())),
        skills: skill_dirs(root)
            .into_iter()
            .filter(|(_, path)| path.join(SKILL_MARKER).is_file())
            .map(|(name, _)| name)
            .collect(),
        ..DiscoveredSource::default()
    };

    let typed: Vec<&str> = ComponentKind::TYPED.iter().map(|k| k.as_str()).collect();
    for (name, path) in dir_entries(root) {
        if !path.is_dir() || typed.contains(&name.as_str()) {
            continue;
        }
        if RESERVED_DIRS.contains(&name.as_str()) || !Layout::is_group_name_allowed(&name) {
            discovered.reserved_ignored.push(name);
        } else {
            discovered.file_groups.push(name);
        }
    }

    tracing::debug!(
        root = %root.display(),
        agents = discovered.agents.len(),
        skills = discovered.skills.len(),
        commands = discovered.commands.len(),
        files = discovered.file_groups.len(),
        "discovered source"
    );

    Ok(discovered)
}

/// Structural checks over a discovered source
pub fn validate(discovered: &DiscoveredSource) -> Vec<Issue> {
    let mut issues = Vec::new();
    let root = &discovered.root_dir;

    let mut by_name: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for name in &discovered.agents {
        let path = discovered.source_path(ComponentKind::Agents, name);
        match agent::load(&path, root) {
            Ok(parsed) => by_name.entry(parsed.name).or_default().push(path),
            Err(reason) => issues.push(
                Issue::new(
                    IssueCode::AgentInvalid,
                    format!("agent '{name}' could not be parsed: {reason}"),
                )
                .at(&path),
            ),
        }
    }
    for (name, paths) in by_name.into_iter().filter(|(_, p)| p.len() > 1) {
        let files: Vec<String> = paths
            .iter()
            .filter_map(|p| p.file_name().map(|f| f.to_string_lossy().into_owned()))
            .collect();
        issues.push(Issue::new(
            IssueCode::DuplicateAgentName,
            format!("agent name '{name}' is declared by {}", files.join(", ")),
        ));
    }

    for (name, path) in skill_dirs(root) {
        if !path.join(SKILL_MARKER).is_file() {
            issues.push(
                Issue::new(
                    IssueCode::SkillMissingMarker,
                    format!("skill directory '{name}' has no {SKILL_MARKER}"),
                )
                .at(&path),
            );
        }
    }

    for name in &discovered.reserved_ignored {
        let message = if Layout::is_group_name_allowed(name) {
            format!("'{name}/' is a reserved directory name and was not installed")
        } else {
            format!("'{name}/' would be installed over '.{name}/' and was not installed")
        };
        issues.push(
            Issue::new(IssueCode::ReservedDirIgnored, message)
            .at(&root.join(name)),
        );
    }

    issues
}

/// Discover and validate in one go
pub fn inspect(root: &Path) -> Result<DiscoveredSource> {
    let mut discovered = discover(root)?;
    discovered.issues = validate(&discovered);
    Ok(discovered)
}
