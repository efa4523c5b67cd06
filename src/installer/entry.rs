//! Installing a single file or directory
//!
//! Every write the installer makes goes through [`install_entry`]: the
//! canonical copy, each tool target and each file group.

use std::path::{Path, PathBuf};

use crate::common::fs::{entry_exists, move_entry, remove_entry};
use crate::domain::InstallMode;
use crate::error::{AgntxError, Result, write_failed};
use crate::path_utils::{make_path_safe, to_forward_slashes};

use super::file_ops::{copy_entry, ensure_parent_dir, link_entry};

/// Backups of targets living outside the base directory
const EXTERNAL_DIR: &str = "_external";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        self == EntryKind::Dir
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Installed { backup: Option<PathBuf> },
    /// Target already existed and overwrite was off
    Skipped,
}

/// Where replaced targets are moved
#[derive(Debug, Clone)]
pub struct BackupPlan {
    pub root: PathBuf,
    pub base_dir: PathBuf,
}

impl BackupPlan {
    /// `<root>/<path relative to base>.backup.<epoch-ms>`, or
    /// `<root>/_external/<flattened path>.backup.<epoch-ms>` outside the base
    pub fn path_for(&self, target: &Path, epoch_ms: i64) -> PathBuf {
        let (dir, name) = match target.strip_prefix(&self.base_dir) {
            Ok(rel) if rel.file_name().is_some() => (
                self.root.join(rel.parent().unwrap_or(Path::new(""))),
                rel.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ),
            _ => (
                self.root.join(EXTERNAL_DIR),
                make_path_safe(&to_forward_slashes(target)),
            ),
        };
        dir.join(format!("{name}.backup.{epoch_ms}"))
    }

    /// First free backup path at or after `epoch_ms`
    fn free_path_for(&self, target: &Path, epoch_ms: i64) -> PathBuf {
        let mut ms = epoch_ms;
        loop {
            let candidate = self.path_for(target, ms);
            if !entry_exists(&candidate) {
                return candidate;
            }
            ms += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntryRequest<'a> {
    pub source: &'a Path,
    pub target: &'a Path,
    pub kind: EntryKind,
    pub mode: InstallMode,
    pub overwrite: bool,
    pub backups: &'a BackupPlan,
    pub dry_run: bool,
}

/// Materialize `source` at `target`.
///
/// An existing target is left alone unless `overwrite` is set, in which case
/// it is first moved into the backup plan. Dry runs only log.
pub fn install_entry(req: &EntryRequest<'_>) -> Result<EntryOutcome> {
    let exists = entry_exists(req.target);
    if exists && !req.overwrite {
        tracing::debug!(target = %req.target.display(), "exists, skipping");
        return Ok(EntryOutcome::Skipped);
    }

    if !req.dry_run && !req.source.exists() {
        return Err(AgntxError::FileNotFound {
            path: req.source.display().to_string(),
        });
    }

    let backup = if exists {
        let dest = req
            .backups
            .free_path_for(req.target, chrono::Utc::now().timestamp_millis());
        if req.dry_run {
            tracing::info!(target = %req.target.display(), backup = %dest.display(), "would back up");
        } else {
            ensure_parent_dir(&dest)?;
            move_entry(req.target, &dest).map_err(|e| write_failed(req.target, &e))?;
            tracing::debug!(target = %req.target.display(), backup = %dest.display(), "backed up");
        }
        Some(dest)
    } else {
        None
    };

    if req.dry_run {
        tracing::info!(
            source = %req.source.display(),
            target = %req.target.display(),
            mode = %req.mode,
            "would install"
        );
        return Ok(EntryOutcome::Installed { backup });
    }

    // Covers an entry recreated since the backup
    remove_entry(req.target).map_err(|e| write_failed(req.target, &e))?;

    match req.mode {
        InstallMode::Copy => copy_entry(req.source, req.target, req.kind.is_dir())?,
        InstallMode::Symlink => link_entry(req.source, req.target, req.kind.is_dir())?,
    }
    tracing::debug!(target = %req.target.display(), mode = %req.mode, "installed");

    Ok(EntryOutcome::Installed { backup })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        base: PathBuf,
        backups: BackupPlan,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().expect("temp dir");
        let base = temp.path().join("base");
        fs::create_dir_all(&base).expect("mkdir");
        let backups = BackupPlan {
            root: base.join(".agents/backups"),
            base_dir: base.clone(),
        };
        Fixture {
            _temp: temp,
            base,
            backups,
        }
    }

    fn request<'a>(
        source: &'a Path,
        target: &'a Path,
        backups: &'a BackupPlan,
        overwrite: bool,
    ) -> EntryRequest<'a> {
        EntryRequest {
            source,
            target,
            kind: EntryKind::File,
            mode: InstallMode::Copy,
            overwrite,
            backups,
            dry_run: false,
        }
    }

    #[test]
    fn test_backup_path_inside_base() {
        let plan = BackupPlan {
            root: PathBuf::from("/b/.agents/backups"),
            base_dir: PathBuf::from("/b"),
        };
        assert_eq!(
            plan.path_for(Path::new("/b/.claude/agents/a.md"), 1700),
            PathBuf::from("/b/.agents/backups/.claude/agents/a.md.backup.1700")
        );
    }

    #[test]
    fn test_backup_path_outside_base() {
        let plan = BackupPlan {
            root: PathBuf::from("/b/.agents/backups"),
            base_dir: PathBuf::from("/b"),
        };
        assert_eq!(
            plan.path_for(Path::new("/elsewhere/x.md"), 5),
            PathBuf::from("/b/.agents/backups/_external/elsewhere-x.md.backup.5")
        );
    }

    #[test]
    fn test_install_new_file() {
        let fx = fixture();
        let source = fx.base.join("src.md");
        fs::write(&source, "v1").expect("write");
        let target = fx.base.join(".claude/agents/a.md");

        let outcome = install_entry(&request(&source, &target, &fx.backups, false)).expect("install");

        assert_eq!(outcome, EntryOutcome::Installed { backup: None });
        assert_eq!(fs::read_to_string(&target).expect("read"), "v1");
    }

    #[test]
    fn test_existing_without_overwrite_is_skipped() {
        let fx = fixture();
        let source = fx.base.join("src.md");
        fs::write(&source, "v2").expect("write");
        let target = fx.base.join("a.md");
        fs::write(&target, "local edit").expect("write");

        let outcome = install_entry(&request(&source, &target, &fx.backups, false)).expect("install");

        assert_eq!(outcome, EntryOutcome::Skipped);
        assert_eq!(fs::read_to_string(&target).expect("read"), "local edit");
        assert!(!fx.backups.root.exists());
    }

    #[test]
    fn test_overwrite_moves_existing_into_backups() {
        let fx = fixture();
        let source = fx.base.join("src.md");
        fs::write(&source, "v2").expect("write");
        let target = fx.base.join(".claude/agents/a.md");
        fs::create_dir_all(target.parent().expect("parent")).expect("mkdir");
        fs::write(&target, "v1").expect("write");

        let outcome = install_entry(&request(&source, &target, &fx.backups, true)).expect("install");

        let EntryOutcome::Installed { backup: Some(backup) } = outcome else {
            panic!("expected a backup, got {outcome:?}");
        };
        assert!(backup.starts_with(fx.backups.root.join(".claude/agents")));
        assert_eq!(fs::read_to_string(&backup).expect("read"), "v1");
        assert_eq!(fs::read_to_string(&target).expect("read"), "v2");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let fx = fixture();
        let source = fx.base.join("src.md");
        fs::write(&source, "v2").expect("write");
        let target = fx.base.join("a.md");
        fs::write(&target, "v1").expect("write");

        let mut req = request(&source, &target, &fx.backups, true);
        req.dry_run = true;
        let outcome = install_entry(&req).expect("install");

        assert!(matches!(outcome, EntryOutcome::Installed { backup: Some(_) }));
        assert_eq!(fs::read_to_string(&target).expect("read"), "v1");
        assert!(!fx.backups.root.exists());
    }

    #[test]
    fn test_missing_source_fails() {
        let fx = fixture();
        let target = fx.base.join("a.md");
        let missing = fx.base.join("missing.md");
        let err = install_entry(&request(&missing, &target, &fx.backups, false)).unwrap_err();
        assert!(matches!(err, AgntxError::FileNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_directory() {
        let fx = fixture();
        let source = fx.base.join(".agents/skills/pdf");
        fs::create_dir_all(&source).expect("mkdir");
        fs::write(source.join("SKILL.md"), "pdf").expect("write");
        let target = fx.base.join(".cursor/skills/pdf");

        let req = EntryRequest {
            kind: EntryKind::Dir,
            mode: InstallMode::Symlink,
            ..request(&source, &target, &fx.backups, false)
        };
        install_entry(&req).expect("install");

        assert!(crate::common::fs::is_symlink(&target));
        assert_eq!(
            fs::canonicalize(&target).expect("resolve"),
            fs::canonicalize(&source).expect("resolve")
        );
    }
}
