//! Runtime integrity checks
//!
//! Compares what the manifest says against what is on disk. Read-only.

use crate::common::fs::{entry_exists, is_symlink};
use crate::domain::{ComponentKind, InstallMode, Issue, IssueCode};
use crate::manifest::RuntimeManifest;

/// Every drift between `manifest` and the filesystem
pub fn collect_runtime_issues(manifest: &RuntimeManifest) -> Vec<Issue> {
    let mut issues = Vec::new();

    for kind in ComponentKind::TYPED {
        for entry in manifest.components.typed(kind) {
            let label = format!("{} '{}'", kind.singular(), entry.name);

            if !entry.canonical_path.exists() {
                issues.push(
                    Issue::new(
                        IssueCode::CanonicalMissing,
                        format!("{label}: canonical copy is missing"),
                    )
                    .at(&entry.canonical_path),
                );
            }

            for target in &entry.targets {
                let path = &target.path;
                let issue = if !entry_exists(path) {
                    Some((IssueCode::TargetMissing, format!("{label}: {} target is missing", target.tool)))
                } else if target.mode == InstallMode::Symlink && !is_symlink(path) {
                    Some((
                        IssueCode::TargetNotSymlink,
                        format!("{label}: {} target was installed as a symlink but is now a regular entry", target.tool),
                    ))
                } else if target.mode == InstallMode::Symlink && !path.exists() {
                    Some((
                        IssueCode::BrokenSymlink,
                        format!("{label}: {} symlink does not resolve", target.tool),
                    ))
                } else {
                    None
                };
                if let Some((code, message)) = issue {
                    issues.push(Issue::new(code, message).at(path));
                }
            }
        }
    }

    for group in &manifest.components.files {
        if !entry_exists(&group.target_path) {
            issues.push(
                Issue::new(
                    IssueCode::TargetMissing,
                    format!("file group '{}' is missing", group.name),
                )
                .at(&group.target_path),
            );
        }
    }

    issues
}
