//! Status command implementation
//!
//! Lists what the manifest of a scope records and checks it against the
//! filesystem. Read-only: a legacy install is migrated in memory only.

use std::path::Path;

use serde::Serialize;

use super::{Context, IssueCounts, Outcome};
use crate::cli::StatusArgs;
use crate::domain::{ComponentKind, Issue};
use crate::error::Result;
use crate::manifest::{self, RuntimeManifest};
use crate::ui::Reporter;
use crate::validate::collect_runtime_issues;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusPayload<'a> {
    installed: bool,
    base_dir: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<&'a RuntimeManifest>,
    /// Read from legacy tracking files
    migrated: bool,
    issues: &'a [Issue],
    summary: IssueCounts,
}

fn print(manifest: &RuntimeManifest, reporter: &Reporter) {
    reporter.field("Source", &manifest.source.input);
    if let Some(commit) = &manifest.source.commit {
        reporter.field("Commit", commit);
    }
    reporter.field("Installed", &manifest.installed_at.to_rfc3339());
    reporter.field("Mode", manifest.mode.as_str());

    for kind in ComponentKind::TYPED {
        let entries = manifest.components.typed(kind);
        if entries.is_empty() {
            continue;
        }
        reporter.field(kind.as_str(), &entries.len().to_string());
        for entry in entries {
            let tools: Vec<String> = entry
                .targets
                .iter()
                .map(|t| format!("{} ({})", t.tool, t.mode))
                .collect();
            let shown = if tools.is_empty() {
                "canonical only".to_string()
            } else {
                tools.join(", ")
            };
            reporter.item(&format!("{}: {shown}", entry.name));
        }
    }
    if !manifest.components.files.is_empty() {
        reporter.field("files", &manifest.components.files.len().to_string());
        for group in &manifest.components.files {
            reporter.item(&format!("{} -> {}", group.name, group.target_path.display()));
        }
    }
}

/// Run status command
pub fn run(ctx: &Context, args: StatusArgs) -> Result<Outcome> {
    let reporter = Reporter::new(args.output.json);
    let layout = ctx.layout(&args.scope)?;

    let Some(loaded) = manifest::load(&layout) else {
        reporter.info(&format!("Nothing installed under {}", layout.base_dir.display()));
        reporter.emit_json(&StatusPayload {
            installed: false,
            base_dir: &layout.base_dir,
            manifest: None,
            migrated: false,
            issues: &[],
            summary: IssueCounts::default(),
        })?;
        return Ok(Outcome::Success);
    };

    let issues = collect_runtime_issues(&loaded.manifest);
    let counts = IssueCounts::of(&issues, 0);

    reporter.heading(&format!(
        "{} install at {}",
        layout.scope,
        layout.base_dir.display()
    ));
    if loaded.is_migrated() {
        reporter.info("Read from legacy tracking files; the next change will convert them");
    }
    print(&loaded.manifest, &reporter);

    if issues.is_empty() {
        reporter.success("Everything is in place");
    } else {
        reporter.info("Issues:");
        for issue in &issues {
            reporter.issue(issue);
        }
        reporter.counts(&[(counts.errors, "errors"), (counts.warnings, "warnings")]);
    }

    reporter.emit_json(&StatusPayload {
        installed: true,
        base_dir: &layout.base_dir,
        manifest: Some(&loaded.manifest),
        migrated: loaded.is_migrated(),
        issues: &issues,
        summary: counts,
    })?;

    Ok(Outcome::from_counts(
        counts.errors,
        counts.warnings,
        0,
        ctx.strict(args.output.strict),
    ))
}
