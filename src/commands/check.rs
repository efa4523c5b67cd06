//! Check command implementation
//!
//! Re-resolves the recorded source and compares BLAKE3 hashes of the
//! canonical copies (and file groups) against it. Drift is reported as
//! `OUTDATED` warnings; nothing on disk changes.

use std::path::Path;

use serde::Serialize;

use super::{Context, IssueCounts, Outcome, resolve_recorded};
use crate::cli::CheckArgs;
use crate::discovery::{self, DiscoveredSource};
use crate::domain::{ComponentKind, Issue, IssueCode};
use crate::error::Result;
use crate::hash::hash_path;
use crate::manifest::RuntimeManifest;
use crate::ui::Reporter;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckPayload<'a> {
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    recorded_commit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_commit: Option<&'a str>,
    issues: &'a [Issue],
    /// Provided by the source now but not installed
    new_components: &'a [String],
    summary: IssueCounts,
}

fn compare(installed: &Path, source: &Path) -> Option<bool> {
    match (hash_path(installed), hash_path(source)) {
        (Ok(a), Ok(b)) => Some(a == b),
        _ => None,
    }
}

/// Compare every manifest entry against `discovered`
pub fn outdated_issues(manifest: &RuntimeManifest, discovered: &DiscoveredSource) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut check = |kind: ComponentKind, name: &str, installed: &Path| {
        let label = format!("{} '{name}'", kind.singular());
        if !discovered.names(kind).iter().any(|n| n == name) {
            issues.push(
                Issue::new(IssueCode::Outdated, format!("{label} is no longer provided by the source"))
                    .at(installed),
            );
            return;
        }
        if !installed.exists() {
            let code = if kind.is_typed() {
                IssueCode::CanonicalMissing
            } else {
                IssueCode::TargetMissing
            };
            issues.push(Issue::new(code, format!("{label} is missing")).at(installed));
            return;
        }
        let source = discovered.source_path(kind, name);
        if compare(installed, &source) == Some(false) {
            issues.push(
                Issue::new(IssueCode::Outdated, format!("{label} differs from the source"))
                    .at(installed),
            );
        }
    };

    for kind in ComponentKind::TYPED {
        for entry in manifest.components.typed(kind) {
            check(kind, &entry.name, &entry.canonical_path);
        }
    }
    for group in &manifest.components.files {
        check(ComponentKind::Files, &group.name, &group.target_path);
    }
    issues
}

/// `kind/name` for everything the source offers that the manifest lacks
pub fn new_components(manifest: &RuntimeManifest, discovered: &DiscoveredSource) -> Vec<String> {
    let mut out = Vec::new();
    for kind in ComponentKind::ALL {
        let installed: Vec<&str> = match kind {
            ComponentKind::Files => manifest.components.files.iter().map(|g| g.name.as_str()).collect(),
            _ => manifest.components.typed(kind).iter().map(|e| e.name.as_str()).collect(),
        };
        out.extend(
            discovered
                .names(kind)
                .iter()
                .filter(|n| !installed.contains(&n.as_str()))
                .map(|n| format!("{kind}/{n}")),
        );
    }
    out
}

/// Run check command
pub fn run(ctx: &Context, args: CheckArgs) -> Result<Outcome> {
    let reporter = Reporter::new(args.output.json);
    let layout = ctx.layout(&args.scope)?;
    let loaded = ctx.require_manifest(&layout)?;
    let manifest = &loaded.manifest;

    let current = resolve_recorded(ctx, &manifest.source, &reporter)?;
    let discovered = discovery::discover(&current.resolved_path)?;

    let issues = outdated_issues(manifest, &discovered);
    let fresh = new_components(manifest, &discovered);
    let counts = IssueCounts::of(&issues, 0);

    reporter.heading(&format!("Checking against {}", manifest.source.input));
    if let (Some(recorded), Some(now)) = (&manifest.source.commit, &current.commit) {
        if recorded != now {
            reporter.field("Commit", &format!("{recorded} -> {now}"));
        }
    }
    if issues.is_empty() {
        reporter.success("Everything matches the source");
    } else {
        for issue in &issues {
            reporter.issue(issue);
        }
        reporter.info("Run 'agntx update' to reinstall from the source");
    }
    if !fresh.is_empty() {
        reporter.info(&format!("Also available, not installed: {}", fresh.join(", ")));
    }

    reporter.emit_json(&CheckPayload {
        source: &manifest.source.input,
        recorded_commit: manifest.source.commit.as_deref(),
        current_commit: current.commit.as_deref(),
        issues: &issues,
        new_components: &fresh,
        summary: counts,
    })?;

    Ok(Outcome::from_counts(
        counts.errors,
        counts.warnings,
        0,
        ctx.strict(args.output.strict),
    ))
}
