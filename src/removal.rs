//! Removing installed components
//!
//! Tool targets go first. A canonical copy is released only once no remaining
//! manifest record points at it, and only when it really lies inside the
//! canonical directory of its kind. Empty canonical directories are pruned
//! afterwards. A deletion that fails is reported and its record is kept.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::common::fs::{prune_empty_parents, remove_entry};
use crate::domain::{ComponentKind, Tool};
use crate::installer::layout::Layout;
use crate::manifest::RuntimeManifest;
use crate::path_utils::{is_strictly_within, lexical_normalize};

/// One removable thing from the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedRecord {
    pub kind: ComponentKind,
    pub name: String,
    /// Owning tool; `None` for file groups and canonical-only entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<Tool>,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<PathBuf>,
}

impl TrackedRecord {
    /// `agents/reviewer (claude)`
    pub fn label(&self) -> String {
        match self.tool {
            Some(tool) => format!("{}/{} ({tool})", self.kind, self.name),
            None => format!("{}/{}", self.kind, self.name),
        }
    }

    fn is_canonical_only(&self) -> bool {
        self.canonical.as_deref() == Some(self.path.as_path())
    }
}

/// Flatten a manifest into removable records, in manifest order
pub fn records(manifest: &RuntimeManifest) -> Vec<TrackedRecord> {
    let mut out = Vec::new();
    for kind in ComponentKind::TYPED {
        for entry in manifest.components.typed(kind) {
            if entry.targets.is_empty() {
                out.push(TrackedRecord {
                    kind,
                    name: entry.name.clone(),
                    tool: None,
                    path: entry.canonical_path.clone(),
                    canonical: Some(entry.canonical_path.clone()),
                });
            }
            for target in &entry.targets {
                out.push(TrackedRecord {
                    kind,
                    name: entry.name.clone(),
                    tool: Some(target.tool),
                    path: target.path.clone(),
                    canonical: Some(entry.canonical_path.clone()),
                });
            }
        }
    }
    for group in &manifest.components.files {
        out.push(TrackedRecord {
            kind: ComponentKind::Files,
            name: group.name.clone(),
            tool: None,
            path: group.target_path.clone(),
            canonical: None,
        });
    }
    out
}

/// A target or canonical copy that could not be deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalReport {
    /// Targets deleted from disk
    pub removed: Vec<PathBuf>,
    /// Targets already gone; their records are dropped anyway
    pub missing: Vec<PathBuf>,
    pub canonical_removed: Vec<PathBuf>,
    /// Deletions that failed; their records stay in the manifest
    pub failed: Vec<RemovalFailure>,
    pub warnings: Vec<String>,
}

/// Remove `selected` records from disk and from `manifest`.
///
/// A failed deletion is reported and skipped, the rest of the batch goes on.
/// The caller writes the manifest back. With `dry_run` nothing on disk or in
/// the manifest changes, but the report still lists what would go.
pub fn remove(
    manifest: &mut RuntimeManifest,
    layout: &Layout,
    selected: &[TrackedRecord],
    dry_run: bool,
) -> RemovalReport {
    let mut report = RemovalReport::default();
    let mut next = manifest.clone();

    for record in selected {
        if !record.is_canonical_only() {
            if record.kind == ComponentKind::Files && !is_own_file_group(record, layout) {
                report.warnings.push(format!(
                    "refusing to delete {}: not the '.{}' directory of {}",
                    record.path.display(),
                    record.name,
                    layout.base_dir.display()
                ));
                continue;
            }
            if !delete(&record.path, dry_run, &mut report) {
                continue;
            }
        }
        forget(&mut next, record);
    }

    // Release canonical copies nobody references any more
    let still_referenced: Vec<PathBuf> = records(&next)
        .into_iter()
        .filter_map(|r| r.canonical)
        .collect();
    let mut released: Vec<(ComponentKind, &Path)> = selected
        .iter()
        .filter_map(|r| r.canonical.as_deref().map(|c| (r.kind, c)))
        .filter(|(_, c)| !still_referenced.iter().any(|p| p == c))
        .collect();
    released.sort();
    released.dedup();

    for (kind, canonical) in released {
        let kind_dir = layout.canonical_dir(kind);
        if !is_strictly_within(canonical, &kind_dir) {
            report.warnings.push(format!(
                "refusing to delete canonical copy {}: outside {}",
                canonical.display(),
                kind_dir.display()
            ));
            continue;
        }
        let existed = crate::common::fs::entry_exists(canonical);
        if !dry_run {
            if let Err(e) = remove_entry(canonical) {
                tracing::warn!(path = %canonical.display(), error = %e, "failed to remove canonical copy");
                report.failed.push(RemovalFailure {
                    path: canonical.to_path_buf(),
                    error: e.to_string(),
                });
                continue;
            }
            if let Some(parent) = canonical.parent() {
                prune_empty_parents(parent, &layout.canonical_root);
            }
        }
        if existed {
            report.canonical_removed.push(canonical.to_path_buf());
        }
    }

    if !dry_run {
        *manifest = next;
    }
    report
}

/// File-group records may only name `<base>/.<name>` for an allowed group name
fn is_own_file_group(record: &TrackedRecord, layout: &Layout) -> bool {
    Layout::is_group_name_allowed(&record.name)
        && lexical_normalize(&record.path) == layout.file_group_path(&record.name)
        && is_strictly_within(&record.path, &layout.base_dir)
}

/// Delete one target. Returns false when the deletion failed.
fn delete(path: &Path, dry_run: bool, report: &mut RemovalReport) -> bool {
    let existed = if dry_run {
        crate::common::fs::entry_exists(path)
    } else {
        match remove_entry(path) {
            Ok(existed) => existed,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove target");
                report.failed.push(RemovalFailure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
                return false;
            }
        }
    };
    tracing::debug!(path = %path.display(), existed, dry_run, "removed target");
    if existed {
        report.removed.push(path.to_path_buf());
    } else {
        report.missing.push(path.to_path_buf());
    }
    true
}

/// Drop `record` from the manifest, and its entry once no target is left
fn forget(manifest: &mut RuntimeManifest, record: &TrackedRecord) {
    if record.kind == ComponentKind::Files {
        manifest.components.files.retain(|g| g.name != record.name);
        manifest.selection.files.retain(|n| n != &record.name);
        return;
    }

    let Some(entries) = manifest.components.typed_mut(record.kind) else {
        return;
    };
    for entry in entries.iter_mut().filter(|e| e.name == record.name) {
        entry.targets.retain(|t| Some(t.tool) != record.tool || t.path != record.path);
    }
    entries.retain(|e| {
        let drop = e.name == record.name && (e.targets.is_empty() || record.is_canonical_only());
        !drop
    });

    let gone = !entries.iter().any(|e| e.name == record.name);
    if gone {
        let names = match record.kind {
            ComponentKind::Agents => &mut manifest.selection.agents,
            ComponentKind::Skills => &mut manifest.selection.skills,
            ComponentKind::Commands => &mut manifest.selection.commands,
            ComponentKind::Files => &mut manifest.selection.files,
        };
        names.retain(|n| n != &record.name);
    }
}
