//! Install command implementation
//!
//! The installation process:
//! 1. Resolve the source (fetching remotes into the cache)
//! 2. Discover and validate what it provides
//! 3. Resolve the selection from flags or prompts
//! 4. Pick scope, mode and tools
//! 5. Lock the canonical root, confirm overwrites
//! 6. Stage into `.agents`, fan out to each tool
//! 7. Write the manifest and report
//!
//! Steps 5 to 7 are shared with `update` through [`execute`].

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use super::{Context, IssueCounts, Outcome, is_interactive, resolve_source, shows_progress};
use crate::cli::InstallArgs;
use crate::discovery::{self, DiscoveredSource};
use crate::domain::{ComponentKind, InstallMode, Issue, Scope, Tool};
use crate::error::Result;
use crate::installer::layout::Layout;
use crate::installer::{self, Action, ActionStatus, InstallPlan, InstallReport, InstallSummary, symlink};
use crate::lock::DirLock;
use crate::manifest::{self, RuntimeManifest, SCHEMA_VERSION};
use crate::prompt::{InquirePrompter, Prompter};
use crate::selection::{self, KindRequest, Requests, Selection};
use crate::source::SourceDescriptor;
use crate::ui::{InteractiveProgressReporter, ProgressReporter, Reporter, SilentProgressReporter};

/// Everything [`execute`] needs once the what and the where are settled
pub struct Pipeline<'a> {
    pub layout: &'a Layout,
    pub source: &'a SourceDescriptor,
    pub discovered: &'a DiscoveredSource,
    pub selection: &'a Selection,
    pub mode: InstallMode,
    pub tools: &'a [Tool],
    pub overwrite: bool,
    pub dry_run: bool,
    /// `None` for automated runs
    pub prompter: Option<&'a dyn Prompter>,
    pub carried: Option<Carried<'a>>,
}

/// Entries of an earlier manifest written back beside the fresh ones
#[derive(Debug, Clone, Copy)]
pub struct Carried<'a> {
    pub from: &'a RuntimeManifest,
    pub names: &'a Selection,
}

#[derive(Debug)]
pub struct Executed {
    pub report: InstallReport,
    /// Where the manifest was written; `None` for dry runs
    pub manifest: Option<PathBuf>,
}

/// Lock, confirm, install and record
pub fn execute(pipeline: &Pipeline<'_>, reporter: &Reporter) -> Result<Executed> {
    symlink::ensure_supported(pipeline.mode)?;

    let _lock = if pipeline.dry_run {
        None
    } else {
        Some(DirLock::acquire(&pipeline.layout.lock_path())?)
    };

    let mut plan = InstallPlan {
        layout: pipeline.layout,
        mode: pipeline.mode,
        tools: pipeline.tools,
        overwrite: pipeline.overwrite,
        dry_run: pipeline.dry_run,
    };

    if !plan.overwrite {
        let conflicts = plan.conflicts(pipeline.discovered, pipeline.selection);
        if !conflicts.is_empty() {
            plan.overwrite = confirm_overwrite(&conflicts, pipeline.prompter, reporter)?;
        }
    }

    let mut progress: Box<dyn ProgressReporter> = if shows_progress(reporter) {
        Box::new(InteractiveProgressReporter::new())
    } else {
        Box::new(SilentProgressReporter)
    };
    let report = installer::install(
        pipeline.discovered,
        pipeline.selection,
        &plan,
        progress.as_mut(),
    );

    // Legacy tracking files are superseded by the manifest written below
    let superseded = if pipeline.dry_run {
        None
    } else {
        manifest::load(pipeline.layout)
    };

    let manifest = if pipeline.dry_run {
        None
    } else {
        let mut manifest = RuntimeManifest {
            schema_version: SCHEMA_VERSION,
            installed_at: Utc::now(),
            base_dir: pipeline.layout.base_dir.clone(),
            canonical_root: pipeline.layout.canonical_root.clone(),
            scope: pipeline.layout.scope,
            mode: pipeline.mode,
            tools: pipeline.tools.to_vec(),
            source: pipeline.source.clone(),
            selection: pipeline.selection.clone(),
            reserved_ignored: pipeline.discovered.reserved_ignored.clone(),
            components: report.components.clone(),
        };
        if let Some(carried) = pipeline.carried {
            manifest.carry_over(carried.from, carried.names);
        }
        Some(manifest::write(&pipeline.layout.canonical_root, &manifest)?)
    };
    if let Some(previous) = superseded {
        previous.remove_legacy_files();
    }

    Ok(Executed { report, manifest })
}

fn confirm_overwrite(
    conflicts: &[PathBuf],
    prompter: Option<&dyn Prompter>,
    reporter: &Reporter,
) -> Result<bool> {
    let Some(prompter) = prompter else {
        reporter.info(&format!(
            "{} existing path(s) differ from the source and will be kept (use --force to replace them)",
            conflicts.len()
        ));
        return Ok(false);
    };

    reporter.info("These paths already exist with different content:");
    for path in conflicts {
        reporter.item(&path.display().to_string());
    }
    prompter.confirm("Overwrite them? Replaced entries are backed up.", false)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(flatten)]
    pub install: InstallSummary,
    #[serde(flatten)]
    pub issues: IssueCounts,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallPayload<'a> {
    pub dry_run: bool,
    pub source: &'a SourceDescriptor,
    pub scope: Scope,
    pub base_dir: &'a std::path::Path,
    pub mode: InstallMode,
    pub tools: &'a [Tool],
    pub selection: &'a Selection,
    pub actions: &'a [Action],
    pub issues: &'a [Issue],
    pub warnings: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<&'a std::path::Path>,
    pub summary: Summary,
}

/// Print the outcome of [`execute`] and compute the exit status
pub fn report_executed(
    pipeline: &Pipeline<'_>,
    executed: &Executed,
    issues: &[Issue],
    warnings: &[String],
    strict: bool,
    reporter: &Reporter,
) -> Result<Outcome> {
    let report = &executed.report;
    let counts = IssueCounts::of(issues, warnings.len());

    for action in report.actions.iter().filter(|a| a.status == ActionStatus::Failed) {
        reporter.error(&format!(
            "{}: {}",
            action_label(action),
            action.error.as_deref().unwrap_or("failed")
        ));
    }
    if !reporter.is_json() {
        for action in report
            .actions
            .iter()
            .filter(|a| a.status == ActionStatus::Installed && a.tool.is_none())
        {
            reporter.item(&action_label(action));
        }
    }

    let summary = report.summary;
    let (prefix, label) = if pipeline.dry_run {
        ("Would install", "to install")
    } else {
        ("Installed", "installed")
    };
    reporter.counts(&[
        (summary.installed, label),
        (summary.skipped, "skipped"),
        (summary.failed, "failed"),
        (summary.backed_up, "backed up"),
    ]);
    match &executed.manifest {
        Some(path) if summary.failed == 0 => {
            reporter.success(&format!("{prefix} into {}", pipeline.layout.base_dir.display()));
            tracing::debug!(manifest = %path.display(), "install recorded");
        }
        Some(_) => reporter.warn("Some items failed; the manifest records only what was installed"),
        None => reporter.info("Dry run: nothing was written"),
    }

    reporter.emit_json(&InstallPayload {
        dry_run: pipeline.dry_run,
        source: pipeline.source,
        scope: pipeline.layout.scope,
        base_dir: &pipeline.layout.base_dir,
        mode: pipeline.mode,
        tools: pipeline.tools,
        selection: pipeline.selection,
        actions: &report.actions,
        issues,
        warnings,
        manifest: executed.manifest.as_deref(),
        summary: Summary {
            install: summary,
            issues: counts,
        },
    })?;

    Ok(Outcome::from_counts(
        counts.errors,
        counts.warnings,
        summary.failed,
        strict,
    ))
}

fn action_label(action: &Action) -> String {
    match action.tool {
        Some(tool) => format!("{}/{} ({tool})", action.kind, action.name),
        None => format!("{}/{}", action.kind, action.name),
    }
}

fn requests(args: &InstallArgs) -> Requests {
    Requests {
        agents: KindRequest::from_flag(args.agents.as_deref()),
        skills: KindRequest::from_flag(args.skills.as_deref()),
        commands: KindRequest::from_flag(args.commands.as_deref()),
        files: KindRequest::from_flag(args.files.as_deref()),
    }
}

/// Print discovery issues and selection warnings as they come up
pub fn report_findings(issues: &[Issue], warnings: &[String], reporter: &Reporter) {
    if !issues.is_empty() {
        reporter.info("Source issues:");
        for issue in issues {
            reporter.issue(issue);
        }
    }
    for warning in warnings {
        reporter.warn(warning);
    }
}

fn pick_scope(ctx: &Context, args: &InstallArgs, prompter: Option<&dyn Prompter>) -> Result<Scope> {
    let explicit = args.scope.scope.is_some()
        || args.scope.path.is_some()
        || ctx.settings.defaults.scope.is_some();
    match prompter {
        Some(p) if !explicit => {
            let items = vec![
                format!("local   ({})", ctx.workspace.display()),
                format!("global  ({})", ctx.settings.home_dir.display()),
            ];
            let picked = p.select("Where should they be installed?", &items, 0)?;
            Ok(if picked == 1 { Scope::Global } else { Scope::Local })
        }
        _ => Ok(ctx.scope(&args.scope)),
    }
}

fn pick_mode(ctx: &Context, args: &InstallArgs, prompter: Option<&dyn Prompter>) -> Result<InstallMode> {
    if let Some(mode) = args.mode.or(ctx.settings.defaults.mode) {
        return Ok(mode);
    }
    let default = symlink::default_mode();
    match prompter {
        Some(p) if symlink::symlinks_supported() => {
            let items = vec![
                "symlink (tools follow the canonical copy)".to_string(),
                "copy    (independent files per tool)".to_string(),
            ];
            let start = usize::from(default == InstallMode::Copy);
            let picked = p.select("How should tools receive them?", &items, start)?;
            Ok(if picked == 1 { InstallMode::Copy } else { InstallMode::Symlink })
        }
        _ => Ok(default),
    }
}

fn pick_tools(
    ctx: &Context,
    args: &InstallArgs,
    selection: &Selection,
    prompter: Option<&dyn Prompter>,
) -> Result<Vec<Tool>> {
    if !args.tools.tools.is_empty() {
        return Ok(dedupe_tools(&args.tools.tools));
    }
    if let Some(tools) = &ctx.settings.defaults.tools {
        return Ok(dedupe_tools(tools));
    }
    let typed = ComponentKind::TYPED.iter().any(|k| !selection.names(*k).is_empty());
    match prompter {
        Some(p) if typed => {
            let items: Vec<String> = Tool::ALL.iter().map(|t| t.to_string()).collect();
            let all: Vec<usize> = (0..items.len()).collect();
            let picked = p.multi_select("Install for which tools?", &items, &all)?;
            Ok(picked.into_iter().filter_map(|i| Tool::ALL.get(i).copied()).collect())
        }
        _ => Ok(Tool::ALL.to_vec()),
    }
}

fn dedupe_tools(tools: &[Tool]) -> Vec<Tool> {
    let mut out = Vec::new();
    for tool in tools {
        if !out.contains(tool) {
            out.push(*tool);
        }
    }
    out
}

/// Run install command
pub fn run(ctx: &Context, args: InstallArgs) -> Result<Outcome> {
    let inquire = InquirePrompter;
    let prompter: Option<&dyn Prompter> = if is_interactive(args.yes, args.output.json) {
        Some(&inquire)
    } else {
        None
    };
    run_with(ctx, &args, prompter)
}

pub(crate) fn run_with(
    ctx: &Context,
    args: &InstallArgs,
    prompter: Option<&dyn Prompter>,
) -> Result<Outcome> {
    let reporter = Reporter::new(args.output.json);
    let strict = ctx.strict(args.output.strict);

    let source = resolve_source(ctx, &args.source, &reporter)?;
    let discovered = discovery::inspect(&source.resolved_path)?;
    tracing::debug!(source = %source.input, path = %source.resolved_path.display(), "source resolved");

    let resolved = selection::resolve(&discovered, &requests(args), prompter)?;
    report_findings(&discovered.issues, &resolved.warnings, &reporter);

    // Nothing to place means nothing to ask about
    let asking = if resolved.selection.is_empty() { None } else { prompter };
    let scope = pick_scope(ctx, args, asking)?;
    let layout = ctx.layout_for(scope, args.scope.path.as_deref())?;
    let mode = pick_mode(ctx, args, asking)?;
    let tools = pick_tools(ctx, args, &resolved.selection, asking)?;

    if resolved.selection.is_empty() {
        reporter.info("Nothing selected; nothing to install");
        let counts = IssueCounts::of(&discovered.issues, resolved.warnings.len());
        reporter.emit_json(&InstallPayload {
            dry_run: args.dry_run,
            source: &source,
            scope,
            base_dir: &layout.base_dir,
            mode,
            tools: &tools,
            selection: &resolved.selection,
            actions: &[],
            issues: &discovered.issues,
            warnings: &resolved.warnings,
            manifest: None,
            summary: Summary {
                install: InstallSummary::default(),
                issues: counts,
            },
        })?;
        return Ok(Outcome::from_counts(counts.errors, counts.warnings, 0, strict));
    }

    let pipeline = Pipeline {
        layout: &layout,
        source: &source,
        discovered: &discovered,
        selection: &resolved.selection,
        mode,
        tools: &tools,
        overwrite: args.force,
        dry_run: args.dry_run,
        prompter,
        carried: None,
    };

    reporter.heading(&format!("Installing from {}", source.input));
    reporter.field("Into", &layout.base_dir.display().to_string());
    reporter.field("Mode", mode.as_str());
    reporter.field(
        "Tools",
        &tools.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", "),
    );

    let executed = execute(&pipeline, &reporter)?;
    report_executed(
        &pipeline,
        &executed,
        &discovered.issues,
        &resolved.warnings,
        strict,
        &reporter,
    )
}
