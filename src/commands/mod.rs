//! Command implementations for the agntx CLI
//!
//! Each command returns an [`Outcome`] that `main` turns into the exit code:
//! 0 on success, 1 for error issues or failed items, 2 for warnings under
//! `--strict`. Fatal problems are returned as errors instead.

pub mod check;
pub mod init;
pub mod inspect;
pub mod install;
pub mod remove;
pub mod status;
pub mod update;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cache::GitFetcher;
use crate::cli::shared::ScopeArgs;
use crate::config::Settings;
use crate::domain::{Issue, Scope, issue::tally};
use crate::error::{AgntxError, Result};
use crate::installer::layout::Layout;
use crate::manifest::{self, Loaded};
use crate::source::{self, SourceDescriptor, SourceType};
use crate::ui::{self, Reporter};

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Error issues or failed items
    Failed,
    /// Warnings under `--strict`
    Warnings,
}

impl Outcome {
    pub fn from_counts(errors: usize, warnings: usize, failed: usize, strict: bool) -> Self {
        if errors > 0 || failed > 0 {
            Outcome::Failed
        } else if strict && warnings > 0 {
            Outcome::Warnings
        } else {
            Outcome::Success
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Failed => 1,
            Outcome::Warnings => 2,
        }
    }
}

/// `summary.errors` / `summary.warnings` in every `--json` payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueCounts {
    pub errors: usize,
    pub warnings: usize,
}

impl IssueCounts {
    /// Issue counts plus free-form warnings (selection, removal guards)
    pub fn of(issues: &[Issue], extra_warnings: usize) -> Self {
        let (errors, warnings) = tally(issues);
        Self {
            errors,
            warnings: warnings + extra_warnings,
        }
    }
}

/// Per-invocation state shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    /// Base for the local scope and for relative paths
    pub workspace: PathBuf,
}

impl Context {
    pub fn new(settings: Settings, workspace: Option<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| AgntxError::IoError {
            message: format!("Failed to get current directory: {e}"),
        })?;
        let workspace = match workspace {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => cwd.join(dir),
            None => cwd,
        };
        Ok(Self {
            settings,
            workspace: crate::path_utils::lexical_normalize(&workspace),
        })
    }

    /// Scope precedence: flag, then `--path` alone, then config, then local
    pub fn scope(&self, args: &ScopeArgs) -> Scope {
        args.scope
            .or_else(|| args.path.as_ref().map(|_| Scope::Path))
            .or(self.settings.defaults.scope)
            .unwrap_or(Scope::Local)
    }

    pub fn layout(&self, args: &ScopeArgs) -> Result<Layout> {
        self.layout_for(self.scope(args), args.path.as_deref())
    }

    pub fn layout_for(&self, scope: Scope, path: Option<&Path>) -> Result<Layout> {
        Layout::resolve(scope, path, &self.settings.home_dir, &self.workspace)
    }

    pub fn strict(&self, flag: bool) -> bool {
        flag || self.settings.defaults.strict.unwrap_or(false)
    }

    /// Manifest for `layout`, or [`AgntxError::ManifestNotFound`]
    pub fn require_manifest(&self, layout: &Layout) -> Result<Loaded> {
        manifest::load(layout).ok_or_else(|| AgntxError::ManifestNotFound {
            path: layout.canonical_root.display().to_string(),
        })
    }
}

/// Prompts are only shown to a human at a terminal
pub fn is_interactive(yes: bool, json: bool) -> bool {
    !yes && !json && console::user_attended()
}

/// Progress output goes to stderr; only draw it for a human
pub fn shows_progress(reporter: &Reporter) -> bool {
    !reporter.is_json() && console::user_attended_stderr()
}

/// Resolve a source argument, fetching remotes into the cache
pub fn resolve_source(ctx: &Context, input: &str, reporter: &Reporter) -> Result<SourceDescriptor> {
    let fetcher = GitFetcher::new(ctx.settings.cache_dir.clone());
    let spinner = ui::spinner(&format!("Resolving {input}"), shows_progress(reporter));
    let resolved = source::resolve(input, &ctx.workspace, &fetcher);
    spinner.finish_and_clear();
    resolved
}

/// Resolve the source a manifest was installed from.
///
/// Local sources are read where they were; remote ones are fetched again
/// from the recorded identifier so a moved ref is picked up.
pub fn resolve_recorded(
    ctx: &Context,
    recorded: &SourceDescriptor,
    reporter: &Reporter,
) -> Result<SourceDescriptor> {
    match recorded.source_type {
        SourceType::Git => resolve_source(ctx, &recorded.input, reporter),
        SourceType::Local => {
            if !recorded.resolved_path.is_dir() {
                return Err(AgntxError::SourceNotFound {
                    path: recorded.resolved_path.display().to_string(),
                });
            }
            Ok(SourceDescriptor {
                commit: crate::git::local_commit(&recorded.resolved_path),
                ..recorded.clone()
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use crate::config::FileDefaults;

    pub fn context(root: &Path) -> Context {
        Context {
            settings: Settings {
                home_dir: root.join("home"),
                cache_dir: root.join("cache"),
                defaults: FileDefaults::default(),
            },
            workspace: root.join("project"),
        }
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::from_counts(0, 0, 0, true).exit_code(), 0);
        assert_eq!(Outcome::from_counts(0, 3, 0, false).exit_code(), 0);
        assert_eq!(Outcome::from_counts(0, 3, 0, true).exit_code(), 2);
        assert_eq!(Outcome::from_counts(1, 3, 0, true).exit_code(), 1);
        assert_eq!(Outcome::from_counts(0, 0, 2, false).exit_code(), 1);
    }

    #[test]
    fn test_scope_precedence() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let mut ctx = context(temp.path());

        assert_eq!(ctx.scope(&ScopeArgs::default()), Scope::Local);

        let path_only = ScopeArgs {
            scope: None,
            path: Some(PathBuf::from("sandbox")),
        };
        assert_eq!(ctx.scope(&path_only), Scope::Path);

        ctx.settings.defaults.scope = Some(Scope::Global);
        assert_eq!(ctx.scope(&ScopeArgs::default()), Scope::Global);

        let flag = ScopeArgs {
            scope: Some(Scope::Local),
            path: None,
        };
        assert_eq!(ctx.scope(&flag), Scope::Local);
    }

    #[test]
    fn test_layout_for_each_scope() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let ctx = context(temp.path());

        let global = ctx.layout_for(Scope::Global, None).expect("layout");
        assert_eq!(global.base_dir, temp.path().join("home"));

        let path = ctx
            .layout(&ScopeArgs {
                scope: None,
                path: Some(PathBuf::from("../sandbox")),
            })
            .expect("layout");
        assert_eq!(path.base_dir, temp.path().join("sandbox"));

        assert!(matches!(
            ctx.layout_for(Scope::Path, None),
            Err(AgntxError::MissingScopePath)
        ));
    }

    #[test]
    fn test_require_manifest_missing() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let ctx = context(temp.path());
        let layout = ctx.layout(&ScopeArgs::default()).expect("layout");
        assert!(matches!(
            ctx.require_manifest(&layout),
            Err(AgntxError::ManifestNotFound { .. })
        ));
    }
}
