//! Runtime manifest (`install-state.json`)
//!
//! One JSON document under the canonical root records everything the last
//! install put on disk. It is replaced as a whole on every install; `status`,
//! `check`, `update` and `remove` read it back.
//!
//! ## Module Organization
//!
//! - `legacy.rs`: reader and migrator for per-tool `.agntx.json` files

pub mod legacy;

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ComponentKind, InstallMode, Scope, Tool};
use crate::error::{AgntxError, Result, write_failed};
use crate::installer::layout::Layout;
use crate::selection::Selection;
use crate::source::SourceDescriptor;

pub const MANIFEST_FILE: &str = "install-state.json";
pub const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeManifest {
    pub schema_version: u32,
    pub installed_at: DateTime<Utc>,
    pub base_dir: PathBuf,
    pub canonical_root: PathBuf,
    pub scope: Scope,
    pub mode: InstallMode,
    pub tools: Vec<Tool>,
    pub source: SourceDescriptor,
    pub selection: Selection,
    #[serde(default)]
    pub reserved_ignored: Vec<String>,
    pub components: Components,
}

impl RuntimeManifest {
    /// Keep the `names` entries of `recorded` beside the fresh ones
    pub fn carry_over(&mut self, recorded: &RuntimeManifest, names: &Selection) {
        for kind in ComponentKind::TYPED {
            let wanted = names.names(kind);
            let entries = recorded
                .components
                .typed(kind)
                .iter()
                .filter(|e| wanted.contains(&e.name))
                .cloned();
            if let Some(list) = self.components.typed_mut(kind) {
                list.extend(entries);
            }
        }
        self.components.files.extend(
            recorded
                .components
                .files
                .iter()
                .filter(|g| names.files.contains(&g.name))
                .cloned(),
        );
        self.selection.agents.extend(names.agents.iter().cloned());
        self.selection.skills.extend(names.skills.iter().cloned());
        self.selection.commands.extend(names.commands.iter().cloned());
        self.selection.files.extend(names.files.iter().cloned());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Components {
    pub agents: Vec<RuntimeComponentEntry>,
    pub skills: Vec<RuntimeComponentEntry>,
    pub commands: Vec<RuntimeComponentEntry>,
    pub files: Vec<RuntimeFileGroupEntry>,
}

impl Components {
    pub fn typed(&self, kind: ComponentKind) -> &[RuntimeComponentEntry] {
        match kind {
            ComponentKind::Agents => &self.agents,
            ComponentKind::Skills => &self.skills,
            ComponentKind::Commands => &self.commands,
            ComponentKind::Files => &[],
        }
    }

    pub fn typed_mut(
        &mut self,
        kind: ComponentKind,
    ) -> Option<&mut Vec<RuntimeComponentEntry>> {
        match kind {
            ComponentKind::Agents => Some(&mut self.agents),
            ComponentKind::Skills => Some(&mut self.skills),
            ComponentKind::Commands => Some(&mut self.commands),
            ComponentKind::Files => None,
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len() + self.skills.len() + self.commands.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An agent, skill or command: one canonical copy, any number of tool targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeComponentEntry {
    pub name: String,
    pub canonical_path: PathBuf,
    pub source_path: PathBuf,
    pub targets: Vec<RuntimeTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeTarget {
    pub tool: Tool,
    pub path: PathBuf,
    pub mode: InstallMode,
}

/// A file group, copied straight to `<base>/.<group>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeFileGroupEntry {
    pub name: String,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub mode: InstallMode,
}

/// Atomically replace the manifest under `canonical_root`
pub fn write(canonical_root: &Path, manifest: &RuntimeManifest) -> Result<PathBuf> {
    let path = canonical_root.join(MANIFEST_FILE);
    std::fs::create_dir_all(canonical_root).map_err(|e| write_failed(canonical_root, &e))?;

    let mut json = serde_json::to_string_pretty(manifest).map_err(|e| AgntxError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    json.push('\n');

    let mut temp = tempfile::NamedTempFile::new_in(canonical_root)
        .map_err(|e| write_failed(canonical_root, &e))?;
    temp.write_all(json.as_bytes())
        .map_err(|e| write_failed(&path, &e))?;
    temp.persist(&path).map_err(|e| write_failed(&path, &e.error))?;

    tracing::debug!(path = %path.display(), "manifest written");
    Ok(path)
}

/// Read the manifest. Absent, malformed or foreign-version files yield `None`.
pub fn read(canonical_root: &Path) -> Option<RuntimeManifest> {
    let path = canonical_root.join(MANIFEST_FILE);
    let content = std::fs::read_to_string(&path).ok()?;

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable manifest");
            return None;
        }
    };

    let version = value.get("schemaVersion").and_then(serde_json::Value::as_u64);
    if version != Some(u64::from(SCHEMA_VERSION)) {
        tracing::warn!(path = %path.display(), ?version, "ignoring manifest with unsupported schemaVersion");
        return None;
    }

    match serde_json::from_value(value) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed manifest");
            None
        }
    }
}

/// A manifest as found on disk, possibly migrated from legacy tracking files
#[derive(Debug, Clone)]
pub struct Loaded {
    pub manifest: RuntimeManifest,
    /// Legacy files the manifest was built from; empty when read directly
    pub legacy_files: Vec<PathBuf>,
}

impl Loaded {
    pub fn is_migrated(&self) -> bool {
        !self.legacy_files.is_empty()
    }

    /// Write the manifest and, for a migration, drop the legacy files
    pub fn persist(&self, layout: &Layout) -> Result<()> {
        write(&layout.canonical_root, &self.manifest)?;
        self.remove_legacy_files();
        Ok(())
    }

    /// Delete the legacy files once a manifest supersedes them
    pub fn remove_legacy_files(&self) {
        for file in &self.legacy_files {
            if let Err(e) = std::fs::remove_file(file) {
                tracing::warn!(path = %file.display(), error = %e, "could not delete legacy tracking file");
            }
        }
    }
}

/// Read the manifest, falling back to legacy tracking files when none exists.
///
/// Nothing is written; callers that mutate state call [`Loaded::persist`].
pub fn load(layout: &Layout) -> Option<Loaded> {
    if let Some(manifest) = read(&layout.canonical_root) {
        return Some(Loaded {
            manifest,
            legacy_files: Vec::new(),
        });
    }
    if layout.manifest_path().exists() {
        return None;
    }
    legacy::migrate(layout)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use crate::source::SourceType;
    use tempfile::TempDir;

    pub fn sample(base: &Path) -> RuntimeManifest {
        let layout = Layout::new(Scope::Local, base);
        RuntimeManifest {
            schema_version: SCHEMA_VERSION,
            installed_at: Utc::now(),
            base_dir: base.to_path_buf(),
            canonical_root: layout.canonical_root.clone(),
            scope: Scope::Local,
            mode: InstallMode::Symlink,
            tools: vec![Tool::Claude, Tool::Cursor],
            source: SourceDescriptor {
                source_type: SourceType::Local,
                input: "./pack".to_string(),
                resolved_path: base.join("pack"),
                repo: None,
                git_ref: None,
                commit: None,
            },
            selection: Selection {
                agents: vec!["reviewer".to_string()],
                ..Selection::default()
            },
            reserved_ignored: vec!["docs".to_string()],
            components: Components {
                agents: vec![RuntimeComponentEntry {
                    name: "reviewer".to_string(),
                    canonical_path: layout.canonical_path(ComponentKind::Agents, "reviewer"),
                    source_path: base.join("pack/agents/reviewer.md"),
                    targets: vec![RuntimeTarget {
                        tool: Tool::Claude,
                        path: layout.tool_path(Tool::Claude, ComponentKind::Agents, "reviewer"),
                        mode: InstallMode::Symlink,
                    }],
                }],
                ..Components::default()
            },
        }
    }

    #[test]
    fn test_write_read_round_trip() {
        let temp = TempDir::new().expect("temp dir");
        let manifest = sample(temp.path());

        write(&manifest.canonical_root, &manifest).expect("write");

        assert_eq!(read(&manifest.canonical_root), Some(manifest));
    }

    #[test]
    fn test_carry_over_keeps_named_entries_only() {
        let temp = TempDir::new().expect("temp dir");
        let recorded = sample(temp.path());
        let mut fresh = sample(temp.path());
        fresh.components = Components::default();
        fresh.selection = Selection::default();

        fresh.carry_over(&recorded, &Selection::default());
        assert!(fresh.components.is_empty());

        let names = Selection {
            agents: vec!["reviewer".to_string()],
            ..Selection::default()
        };
        fresh.carry_over(&recorded, &names);
        assert_eq!(fresh.components, recorded.components);
        assert_eq!(fresh.selection.agents, vec!["reviewer"]);
    }

    #[test]
    fn test_round_trip_empty_collections() {
        let temp = TempDir::new().expect("temp dir");
        let mut manifest = sample(temp.path());
        manifest.components = Components::default();
        manifest.selection = Selection::default();
        manifest.tools.clear();
        manifest.reserved_ignored.clear();

        write(&manifest.canonical_root, &manifest).expect("write");

        let back = read(&manifest.canonical_root).expect("read");
        assert!(back.components.is_empty());
        assert_eq!(back, manifest);
    }

    #[test]
    fn test_json_shape() {
        let temp = TempDir::new().expect("temp dir");
        let manifest = sample(temp.path());
        let json = serde_json::to_value(&manifest).expect("json");

        assert_eq!(json["schemaVersion"], 2);
        assert_eq!(json["scope"], "local");
        assert_eq!(json["mode"], "symlink");
        assert_eq!(json["tools"], serde_json::json!(["claude", "cursor"]));
        assert_eq!(json["source"]["sourceType"], "local");
        assert!(json["components"]["agents"][0]["canonicalPath"].is_string());
        assert_eq!(json["components"]["agents"][0]["targets"][0]["tool"], "claude");
        assert!(json["components"]["files"].is_array());
    }

    #[test]
    fn test_read_absent() {
        let temp = TempDir::new().expect("temp dir");
        assert_eq!(read(temp.path()), None);
    }

    #[test]
    fn test_read_rejects_other_schema_version() {
        let temp = TempDir::new().expect("temp dir");
        let manifest = sample(temp.path());
        let mut json = serde_json::to_value(&manifest).expect("json");
        json["schemaVersion"] = serde_json::json!(1);
        std::fs::create_dir_all(&manifest.canonical_root).expect("mkdir");
        std::fs::write(manifest.canonical_root.join(MANIFEST_FILE), json.to_string()).expect("write");

        assert_eq!(read(&manifest.canonical_root), None);
    }

    #[test]
    fn test_read_requires_component_lists() {
        let temp = TempDir::new().expect("temp dir");
        let manifest = sample(temp.path());
        let mut json = serde_json::to_value(&manifest).expect("json");
        json["components"]["skills"] = serde_json::json!({});
        std::fs::create_dir_all(&manifest.canonical_root).expect("mkdir");
        std::fs::write(manifest.canonical_root.join(MANIFEST_FILE), json.to_string()).expect("write");

        assert_eq!(read(&manifest.canonical_root), None);
    }

    #[test]
    fn test_read_malformed() {
        let temp = TempDir::new().expect("temp dir");
        std::fs::write(temp.path().join(MANIFEST_FILE), "{ not json").expect("write");
        assert_eq!(read(temp.path()), None);
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let temp = TempDir::new().expect("temp dir");
        let manifest = sample(temp.path());
        write(&manifest.canonical_root, &manifest).expect("write");
        write(&manifest.canonical_root, &manifest).expect("rewrite");

        let names: Vec<_> = std::fs::read_dir(&manifest.canonical_root)
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![MANIFEST_FILE.to_string()]);
    }
}
