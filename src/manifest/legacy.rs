//! Legacy per-tool tracking files
//!
//! Older releases kept a `.agntx.json` inside each tool's agents directory:
//!
//! ```json
//! { "agents": { "reviewer.md": { "name": "reviewer", "source": "acme/agents", ... } } }
//! ```
//!
//! Entries written by the earliest releases are keyed by the bare agent name
//! and carry no `installedPath`. The reader fills that in so the rest of the
//! crate only ever sees the current shape.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Components, Loaded, RuntimeComponentEntry, RuntimeManifest, RuntimeTarget, SCHEMA_VERSION};
use crate::domain::{ComponentKind, InstallMode, Tool};
use crate::installer::layout::Layout;
use crate::selection::Selection;
use crate::source::{RepoSpec, SourceDescriptor, SourceType};

pub const LEGACY_FILE: &str = ".agntx.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledAgent {
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub installed_at: Option<String>,
    #[serde(default)]
    pub symlink: bool,
    /// Where the agent came from inside the source
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Relative to the tool's agents directory
    #[serde(default)]
    pub installed_path: String,
    #[serde(default)]
    pub canonical_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct TrackingFile {
    #[serde(default)]
    agents: BTreeMap<String, InstalledAgent>,
}

pub fn tracking_file(layout: &Layout, tool: Tool) -> PathBuf {
    layout
        .tool_dir(tool)
        .join(ComponentKind::Agents.as_str())
        .join(LEGACY_FILE)
}

/// Parse a tracking file into entries keyed by installed relative path
pub fn read(path: &Path) -> Option<BTreeMap<String, InstalledAgent>> {
    let content = std::fs::read_to_string(path).ok()?;
    let parsed: TrackingFile = match serde_json::from_str(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable legacy tracking file");
            return None;
        }
    };

    Some(
        parsed
            .agents
            .into_iter()
            .map(|(key, mut agent)| {
                if agent.installed_path.is_empty() {
                    agent.installed_path = if key.ends_with(".md") {
                        key.clone()
                    } else {
                        format!("{key}.md")
                    };
                }
                (agent.installed_path.clone(), agent)
            })
            .collect(),
    )
}

/// Build a manifest from every tool's tracking file. `None` when there are none.
pub fn migrate(layout: &Layout) -> Option<Loaded> {
    let mut files = Vec::new();
    let mut by_name: BTreeMap<String, RuntimeComponentEntry> = BTreeMap::new();
    let mut tools = Vec::new();
    let mut any_symlink = false;
    let mut source_input: Option<String> = None;
    let mut oldest: Option<DateTime<Utc>> = None;

    for tool in Tool::ALL {
        let file = tracking_file(layout, tool);
        let Some(agents) = read(&file) else {
            continue;
        };
        files.push(file);
        tools.push(tool);

        let agents_dir = layout.tool_dir(tool).join(ComponentKind::Agents.as_str());
        for agent in agents.into_values() {
            any_symlink |= agent.symlink;
            if source_input.is_none() && !agent.source.is_empty() {
                source_input = Some(agent.source.clone());
            }
            if let Some(at) = agent
                .installed_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            {
                let at = at.with_timezone(&Utc);
                oldest = Some(oldest.map_or(at, |o| o.min(at)));
            }

            let stem = agent
                .installed_path
                .strip_suffix(".md")
                .unwrap_or(&agent.installed_path)
                .to_string();
            let entry = by_name
                .entry(agent.name.clone())
                .or_insert_with(|| RuntimeComponentEntry {
                    name: agent.name.clone(),
                    canonical_path: agent
                        .canonical_path
                        .clone()
                        .unwrap_or_else(|| layout.canonical_path(ComponentKind::Agents, &stem)),
                    source_path: agent.path.clone().unwrap_or_default(),
                    targets: Vec::new(),
                });
            entry.targets.push(RuntimeTarget {
                tool,
                path: agents_dir.join(&agent.installed_path),
                mode: if agent.symlink {
                    InstallMode::Symlink
                } else {
                    InstallMode::Copy
                },
            });
        }
    }

    if files.is_empty() {
        return None;
    }

    let input = source_input.unwrap_or_default();
    let source = match RepoSpec::parse(&input) {
        Ok(spec) => SourceDescriptor {
            source_type: SourceType::Git,
            input: input.clone(),
            resolved_path: PathBuf::new(),
            repo: Some(spec.slug()),
            git_ref: spec.git_ref,
            commit: None,
        },
        Err(_) => SourceDescriptor {
            source_type: SourceType::Local,
            resolved_path: PathBuf::from(&input),
            input,
            repo: None,
            git_ref: None,
            commit: None,
        },
    };

    let agents: Vec<RuntimeComponentEntry> = by_name.into_values().collect();
    tracing::info!(
        agents = agents.len(),
        files = files.len(),
        "migrating legacy tracking files"
    );

    Some(Loaded {
        manifest: RuntimeManifest {
            schema_version: SCHEMA_VERSION,
            installed_at: oldest.unwrap_or_else(Utc::now),
            base_dir: layout.base_dir.clone(),
            canonical_root: layout.canonical_root.clone(),
            scope: layout.scope,
            mode: if any_symlink {
                InstallMode::Symlink
            } else {
                InstallMode::Copy
            },
            tools,
            source,
            selection: Selection {
                agents: agents.iter().map(|a| a.name.clone()).collect(),
                ..Selection::default()
            },
            reserved_ignored: Vec::new(),
            components: Components {
                agents,
                ..Components::default()
            },
        },
        legacy_files: files,
    })
}
