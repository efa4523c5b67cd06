//! Installation into a scope
//!
//! This module handles:
//! - Staging every selected agent, skill and command into the canonical root
//! - Fanning canonical copies out to each selected tool, by copy or symlink
//! - Copying file groups straight to `<base>/.<group>`
//! - Counting per-item outcomes without aborting on the first failure
//!
//! ## Module Organization
//!
//! - `layout.rs`: where everything lives under a scope base directory
//! - `entry.rs`: one file or directory, with overwrite and backups
//! - `file_ops.rs`: copy and symlink primitives
//! - `symlink.rs`: symlink capability check

pub mod entry;
pub mod file_ops;
pub mod layout;
pub mod symlink;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::common::fs::{entry_exists, is_symlink};
use crate::discovery::DiscoveredSource;
use crate::domain::{ComponentKind, InstallMode, Tool};
use crate::manifest::{Components, RuntimeComponentEntry, RuntimeFileGroupEntry, RuntimeTarget};
use crate::selection::Selection;
use crate::ui::ProgressReporter;

use entry::{BackupPlan, EntryKind, EntryOutcome, EntryRequest, install_entry};
use layout::Layout;

/// Everything that shapes one install run
#[derive(Debug, Clone)]
pub struct InstallPlan<'a> {
    pub layout: &'a Layout,
    pub mode: InstallMode,
    pub tools: &'a [Tool],
    pub overwrite: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallSummary {
    pub installed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub backed_up: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Installed,
    Skipped,
    Failed,
}

/// One line of the install log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub kind: ComponentKind,
    pub name: String,
    /// `None` for the canonical stage and for file groups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<Tool>,
    pub target: PathBuf,
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub summary: InstallSummary,
    pub actions: Vec<Action>,
    /// Manifest components for everything now in place
    pub components: Components,
}

impl InstallReport {
    fn record(
        &mut self,
        kind: ComponentKind,
        name: &str,
        tool: Option<Tool>,
        target: &Path,
        result: &crate::error::Result<EntryOutcome>,
    ) {
        let (status, backup, error) = match result {
            Ok(EntryOutcome::Installed { backup }) => {
                self.summary.installed += 1;
                if backup.is_some() {
                    self.summary.backed_up += 1;
                }
                (ActionStatus::Installed, backup.clone(), None)
            }
            Ok(EntryOutcome::Skipped) => {
                self.summary.skipped += 1;
                (ActionStatus::Skipped, None, None)
            }
            Err(e) => {
                self.summary.failed += 1;
                tracing::warn!(target = %target.display(), error = %e, "install failed");
                (ActionStatus::Failed, None, Some(e.to_string()))
            }
        };
        self.actions.push(Action {
            kind,
            name: name.to_string(),
            tool,
            target: target.to_path_buf(),
            status,
            backup,
            error,
        });
    }
}

impl InstallPlan<'_> {
    fn backups(&self) -> BackupPlan {
        BackupPlan {
            root: self.layout.backups_dir(),
            base_dir: self.layout.base_dir.clone(),
        }
    }

    fn request<'b>(
        &self,
        source: &'b Path,
        target: &'b Path,
        kind: ComponentKind,
        mode: InstallMode,
        backups: &'b BackupPlan,
    ) -> EntryRequest<'b> {
        EntryRequest {
            source,
            target,
            kind: if kind.is_directory() {
                EntryKind::Dir
            } else {
                EntryKind::File
            },
            mode,
            overwrite: self.overwrite,
            backups,
            dry_run: self.dry_run,
        }
    }

    /// Existing paths this plan would replace with different content.
    ///
    /// Targets that already match (same bytes, or a symlink to the canonical
    /// copy) are not conflicts.
    pub fn conflicts(&self, discovered: &DiscoveredSource, selection: &Selection) -> Vec<PathBuf> {
        let mut out = Vec::new();
        for kind in ComponentKind::TYPED {
            for name in selection.names(kind) {
                let source = discovered.source_path(kind, name);
                let canonical = self.layout.canonical_path(kind, name);
                if entry_exists(&canonical) && !crate::hash::same_content(&source, &canonical) {
                    out.push(canonical.clone());
                }
                for tool in self.tools.iter().filter(|t| t.supports(kind)) {
                    let target = self.layout.tool_path(*tool, kind, name);
                    if entry_exists(&target)
                        && !is_equivalent(&target, &canonical)
                        && !crate::hash::same_content(&source, &target)
                    {
                        out.push(target);
                    }
                }
            }
        }
        for name in selection.names(ComponentKind::Files) {
            let target = self.layout.file_group_path(name);
            if entry_exists(&target)
                && !crate::hash::same_content(&discovered.source_path(ComponentKind::Files, name), &target)
            {
                out.push(target);
            }
        }
        out
    }
}

/// True when an existing target already stands for `canonical`
pub fn is_equivalent(target: &Path, canonical: &Path) -> bool {
    if is_symlink(target) {
        return match (dunce::canonicalize(target), dunce::canonicalize(canonical)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
    }
    crate::hash::same_content(target, canonical)
}

fn actual_mode(target: &Path) -> InstallMode {
    if is_symlink(target) {
        InstallMode::Symlink
    } else {
        InstallMode::Copy
    }
}

/// Install `selection` from `discovered` according to `plan`.
///
/// Per-item failures are counted in the report and never abort the run.
pub fn install(
    discovered: &DiscoveredSource,
    selection: &Selection,
    plan: &InstallPlan<'_>,
    progress: &mut dyn ProgressReporter,
) -> InstallReport {
    let mut report = InstallReport::default();
    let backups = plan.backups();
    progress.start(selection.total() as u64);

    for kind in ComponentKind::TYPED {
        for name in selection.names(kind) {
            progress.step(&format!("{}/{name}", kind.as_str()));
            if let Some(entry) = install_component(discovered, kind, name, plan, &backups, &mut report) {
                if let Some(list) = report.components.typed_mut(kind) {
                    list.push(entry);
                }
            }
        }
    }

    for name in selection.names(ComponentKind::Files) {
        progress.step(&format!("files/{name}"));
        let source = discovered.source_path(ComponentKind::Files, name);
        let target = plan.layout.file_group_path(name);
        let result = install_entry(&plan.request(
            &source,
            &target,
            ComponentKind::Files,
            InstallMode::Copy,
            &backups,
        ));
        report.record(ComponentKind::Files, name, None, &target, &result);
        let owned = match result {
            Ok(EntryOutcome::Installed { .. }) => true,
            Ok(EntryOutcome::Skipped) => crate::hash::same_content(&source, &target),
            Err(_) => false,
        };
        if owned {
            report.components.files.push(RuntimeFileGroupEntry {
                name: name.clone(),
                source_path: source,
                target_path: target,
                mode: InstallMode::Copy,
            });
        }
    }

    progress.finish();
    tracing::debug!(summary = ?report.summary, "install finished");
    report
}

/// Canonical stage then tool fan-out for one component
fn install_component(
    discovered: &DiscoveredSource,
    kind: ComponentKind,
    name: &str,
    plan: &InstallPlan<'_>,
    backups: &BackupPlan,
    report: &mut InstallReport,
) -> Option<RuntimeComponentEntry> {
    let source = discovered.source_path(kind, name);
    let canonical = plan.layout.canonical_path(kind, name);

    let staged = install_entry(&plan.request(&source, &canonical, kind, InstallMode::Copy, backups));
    report.record(kind, name, None, &canonical, &staged);
    if staged.is_err() {
        return None;
    }

    let mut targets = Vec::new();
    for tool in plan.tools.iter().copied().filter(|t| t.supports(kind)) {
        let target = plan.layout.tool_path(tool, kind, name);
        let result = install_entry(&plan.request(&canonical, &target, kind, plan.mode, backups));
        report.record(kind, name, Some(tool), &target, &result);

        match result {
            Ok(EntryOutcome::Installed { .. }) => targets.push(RuntimeTarget {
                tool,
                path: target,
                mode: plan.mode,
            }),
            Ok(EntryOutcome::Skipped) if is_equivalent(&target, &canonical) => {
                targets.push(RuntimeTarget {
                    tool,
                    mode: actual_mode(&target),
                    path: target,
                });
            }
            Ok(EntryOutcome::Skipped) => {
                tracing::debug!(target = %target.display(), "kept differing target out of the manifest");
            }
            Err(_) => {}
        }
    }

    Some(RuntimeComponentEntry {
        name: name.to_string(),
        canonical_path: canonical,
        source_path: source,
        targets,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::discovery;
    use crate::domain::Scope;
    use crate::ui::SilentProgressReporter;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        source: PathBuf,
        layout: Layout,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().expect("temp dir");
        let source = temp.path().join("pack");
        let write = |rel: &str, content: &str| {
            let path = source.join(rel);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(path, content).expect("write");
        };
        write("agents/reviewer.md", "---\nname: reviewer\n---\nReview.\n");
        write("skills/pdf/SKILL.md", "# pdf\n");
        write("skills/pdf/scripts/run.sh", "echo\n");
        write("commands/ship.md", "Ship it\n");
        write("hooks/pre.sh", "echo hook\n");

        let layout = Layout::new(Scope::Local, temp.path().join("project"));
        fs::create_dir_all(&layout.base_dir).expect("mkdir");
        Fixture {
            _temp: temp,
            source,
            layout,
        }
    }

    fn run(fx: &Fixture, mode: InstallMode, overwrite: bool) -> InstallReport {
        let discovered = discovery::discover(&fx.source).expect("discover");
        let selection = Selection::everything(&discovered);
        let plan = InstallPlan {
            layout: &fx.layout,
            mode,
            tools: &Tool::ALL,
            overwrite,
            dry_run: false,
        };
        install(&discovered, &selection, &plan, &mut SilentProgressReporter)
    }

    #[test]
    fn test_copy_install_stages_and_fans_out() {
        let fx = fixture();
        let report = run(&fx, InstallMode::Copy, false);

        // 3 canonical + 6 tool targets + 1 file group
        assert_eq!(report.summary.installed, 10);
        assert_eq!(report.summary.failed, 0);
        assert!(fx.layout.canonical_path(ComponentKind::Agents, "reviewer").is_file());
        assert!(fx.layout.tool_path(Tool::Cursor, ComponentKind::Skills, "pdf").join("scripts/run.sh").is_file());
        assert!(fx.layout.file_group_path("hooks").join("pre.sh").is_file());
        assert!(!fx.layout.tool_dir(Tool::Claude).join("files").exists());
        assert_eq!(report.components.agents[0].targets.len(), 2);
        assert_eq!(report.components.files[0].mode, InstallMode::Copy);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_point_at_canonical_not_source() {
        let fx = fixture();
        run(&fx, InstallMode::Symlink, false);

        let target = fx.layout.tool_path(Tool::Claude, ComponentKind::Agents, "reviewer");
        let canonical = fx.layout.canonical_path(ComponentKind::Agents, "reviewer");
        assert!(is_symlink(&target));
        assert_eq!(
            fs::canonicalize(&target).expect("resolve"),
            fs::canonicalize(&canonical).expect("resolve")
        );

        fs::remove_dir_all(&fx.source).expect("rm source");
        assert_eq!(
            fs::read_to_string(&target).expect("read"),
            "---\nname: reviewer\n---\nReview.\n"
        );
    }

    #[test]
    fn test_rerun_without_overwrite_skips_and_keeps_manifest_complete() {
        let fx = fixture();
        run(&fx, InstallMode::Copy, false);
        let report = run(&fx, InstallMode::Copy, false);

        assert_eq!(report.summary.installed, 0);
        assert_eq!(report.summary.skipped, 10);
        assert_eq!(report.components.agents[0].targets.len(), 2);
        assert_eq!(report.components.files.len(), 1);
    }

    #[test]
    fn test_differing_skipped_target_is_not_recorded() {
        let fx = fixture();
        run(&fx, InstallMode::Copy, false);
        let edited = fx.layout.tool_path(Tool::Claude, ComponentKind::Commands, "ship");
        fs::write(&edited, "my version").expect("write");

        let report = run(&fx, InstallMode::Copy, false);

        assert_eq!(fs::read_to_string(&edited).expect("read"), "my version");
        let tools: Vec<Tool> = report.components.commands[0].targets.iter().map(|t| t.tool).collect();
        assert_eq!(tools, vec![Tool::Cursor]);
    }

    #[test]
    fn test_differing_skipped_file_group_is_not_recorded() {
        let fx = fixture();
        let own = fx.layout.file_group_path("hooks").join("mine.sh");
        fs::create_dir_all(own.parent().expect("parent")).expect("mkdir");
        fs::write(&own, "my hook").expect("write");

        let report = run(&fx, InstallMode::Copy, false);

        assert_eq!(report.summary.skipped, 1);
        assert!(report.components.files.is_empty());
        assert_eq!(fs::read_to_string(&own).expect("read"), "my hook");
    }

    #[test]
    fn test_overwrite_backs_up_each_replaced_path_once() {
        let fx = fixture();
        run(&fx, InstallMode::Copy, false);
        let report = run(&fx, InstallMode::Copy, true);

        assert_eq!(report.summary.installed, 10);
        assert_eq!(report.summary.backed_up, 10);

        let backups: Vec<_> = walkdir::WalkDir::new(fx.layout.backups_dir())
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".backup."))
            .collect();
        assert_eq!(backups.len(), 10);
    }

    #[test]
    fn test_failed_item_does_not_abort() {
        let fx = fixture();
        let discovered = discovery::discover(&fx.source).expect("discover");
        let mut selection = Selection::everything(&discovered);
        selection.agents.insert(0, "ghost".to_string());
        let plan = InstallPlan {
            layout: &fx.layout,
            mode: InstallMode::Copy,
            tools: &[Tool::Claude],
            overwrite: false,
            dry_run: false,
        };

        let report = install(&discovered, &selection, &plan, &mut SilentProgressReporter);

        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.components.agents.len(), 1);
        assert!(fx.layout.tool_path(Tool::Claude, ComponentKind::Skills, "pdf").is_dir());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let fx = fixture();
        let discovered = discovery::discover(&fx.source).expect("discover");
        let plan = InstallPlan {
            layout: &fx.layout,
            mode: InstallMode::Copy,
            tools: &Tool::ALL,
            overwrite: false,
            dry_run: true,
        };

        let report = install(&discovered, &Selection::everything(&discovered), &plan, &mut SilentProgressReporter);

        assert_eq!(report.summary.installed, 10);
        assert!(!fx.layout.canonical_root.exists());
        assert!(!fx.layout.tool_dir(Tool::Claude).exists());
    }

    #[test]
    fn test_conflicts_ignore_matching_targets() {
        let fx = fixture();
        run(&fx, InstallMode::Copy, false);
        let discovered = discovery::discover(&fx.source).expect("discover");
        let selection = Selection::everything(&discovered);
        let plan = InstallPlan {
            layout: &fx.layout,
            mode: InstallMode::Copy,
            tools: &Tool::ALL,
            overwrite: false,
            dry_run: false,
        };
        assert!(plan.conflicts(&discovered, &selection).is_empty());

        let edited = fx.layout.tool_path(Tool::Cursor, ComponentKind::Agents, "reviewer");
        fs::write(&edited, "changed").expect("write");
        assert_eq!(plan.conflicts(&discovered, &selection), vec![edited]);
    }
}
