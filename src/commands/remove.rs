//! Remove command implementation
//!
//! Picks tracked records by name, kind and tool (or interactively), deletes
//! them through the removal engine and writes the manifest back.

use serde::Serialize;

use super::{Context, IssueCounts, Outcome, is_interactive};
use crate::cli::RemoveArgs;
use crate::error::{AgntxError, Result};
use crate::lock::DirLock;
use crate::prompt::{InquirePrompter, Prompter};
use crate::removal::{self, RemovalReport, TrackedRecord};
use crate::ui::Reporter;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemovePayload<'a> {
    dry_run: bool,
    selected: &'a [TrackedRecord],
    #[serde(flatten)]
    report: &'a RemovalReport,
    summary: IssueCounts,
}

/// Records left after `--kind` and `--tools`
fn filtered(records: Vec<TrackedRecord>, args: &RemoveArgs) -> Vec<TrackedRecord> {
    records
        .into_iter()
        .filter(|r| args.kind.is_empty() || args.kind.contains(&r.kind))
        .filter(|r| match r.tool {
            _ if args.tools.tools.is_empty() => true,
            Some(tool) => args.tools.tools.contains(&tool),
            None => false,
        })
        .collect()
}

fn choose(
    candidates: Vec<TrackedRecord>,
    args: &RemoveArgs,
    prompter: Option<&dyn Prompter>,
) -> Result<Vec<TrackedRecord>> {
    if !args.names.is_empty() {
        let unknown: Vec<&str> = args
            .names
            .iter()
            .filter(|n| !candidates.iter().any(|r| &r.name == *n))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            let mut available: Vec<String> = candidates.iter().map(|r| r.name.clone()).collect();
            available.dedup();
            return Err(AgntxError::InvalidSelection {
                kind: "installed components".to_string(),
                invalid: unknown.join(", "),
                available: if available.is_empty() {
                    "none".to_string()
                } else {
                    available.join(", ")
                },
            });
        }
        return Ok(candidates
            .into_iter()
            .filter(|r| args.names.contains(&r.name))
            .collect());
    }

    if args.all {
        return Ok(candidates);
    }

    let Some(prompter) = prompter else {
        return Err(AgntxError::SelectionRequired {
            message: "Name the components to remove, or pass --all".to_string(),
        });
    };
    if candidates.is_empty() {
        return Ok(Vec::new());
    }
    let labels: Vec<String> = candidates.iter().map(TrackedRecord::label).collect();
    let picked = prompter.multi_select("Select what to remove", &labels, &[])?;
    Ok(candidates
        .into_iter()
        .enumerate()
        .filter(|(i, _)| picked.contains(i))
        .map(|(_, r)| r)
        .collect())
}

/// Run remove command
pub fn run(ctx: &Context, args: RemoveArgs) -> Result<Outcome> {
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
    args: &RemoveArgs,
    prompter: Option<&dyn Prompter>,
) -> Result<Outcome> {
    let reporter = Reporter::new(args.output.json);
    let layout = ctx.layout(&args.scope)?;
    let mut loaded = ctx.require_manifest(&layout)?;

    let candidates = filtered(removal::records(&loaded.manifest), args);
    let selected = choose(candidates, args, prompter)?;

    if selected.is_empty() {
        reporter.info("Nothing to remove");
        reporter.emit_json(&RemovePayload {
            dry_run: args.dry_run,
            selected: &[],
            report: &RemovalReport::default(),
            summary: IssueCounts::default(),
        })?;
        return Ok(Outcome::Success);
    }

    if !args.dry_run {
        if let Some(p) = prompter {
            reporter.info("About to remove:");
            for record in &selected {
                reporter.item(&record.label());
            }
            if !p.confirm(&format!("Remove {} item(s)?", selected.len()), false)? {
                reporter.info("Cancelled");
                return Ok(Outcome::Success);
            }
        }
    }

    let _lock = if args.dry_run {
        None
    } else {
        Some(DirLock::acquire(&layout.lock_path())?)
    };
    let report = removal::remove(&mut loaded.manifest, &layout, &selected, args.dry_run);
    if !args.dry_run {
        loaded.persist(&layout)?;
    }

    let verb = if args.dry_run { "Would remove" } else { "Removed" };
    for path in &report.removed {
        reporter.item(&format!("{verb} {}", path.display()));
    }
    for path in &report.canonical_removed {
        reporter.item(&format!("{verb} canonical {}", path.display()));
    }
    for path in &report.missing {
        reporter.item(&format!("Already gone: {}", path.display()));
    }
    for warning in &report.warnings {
        reporter.warn(warning);
    }
    for failure in &report.failed {
        reporter.error(&format!(
            "Failed to remove {}: {}",
            failure.path.display(),
            failure.error
        ));
    }
    if report.failed.is_empty() {
        reporter.success(&format!("{verb} {} item(s)", selected.len()));
    }

    let counts = IssueCounts {
        errors: report.failed.len(),
        warnings: report.warnings.len(),
    };
    reporter.emit_json(&RemovePayload {
        dry_run: args.dry_run,
        selected: &selected,
        report: &report,
        summary: counts,
    })?;

    Ok(Outcome::from_counts(
        0,
        counts.warnings,
        report.failed.len(),
        ctx.strict(args.output.strict),
    ))
}
