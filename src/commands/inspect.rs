//! Inspect command implementation
//!
//! Resolves a source and reports what it provides, plus structural issues.
//! Never writes outside the git cache.

use serde::Serialize;

use super::{Context, IssueCounts, Outcome, resolve_source};
use crate::cli::InspectArgs;
use crate::discovery::{self, DiscoveredSource};
use crate::domain::ComponentKind;
use crate::error::Result;
use crate::source::SourceDescriptor;
use crate::ui::Reporter;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectPayload<'a> {
    source: &'a SourceDescriptor,
    #[serde(flatten)]
    discovered: &'a DiscoveredSource,
    summary: IssueCounts,
}

fn print(discovered: &DiscoveredSource, reporter: &Reporter) {
    for kind in ComponentKind::ALL {
        let names = discovered.names(kind);
        reporter.field(kind.as_str(), &names.len().to_string());
        for name in names {
            reporter.item(name);
        }
    }
    if !discovered.reserved_ignored.is_empty() {
        reporter.field("ignored", &discovered.reserved_ignored.join(", "));
    }

    if discovered.issues.is_empty() {
        reporter.success("No issues found");
    } else {
        reporter.info("Issues:");
        for issue in &discovered.issues {
            reporter.issue(issue);
        }
    }
}

/// Run inspect command
pub fn run(ctx: &Context, args: InspectArgs) -> Result<Outcome> {
    let reporter = Reporter::new(args.output.json);
    let source = resolve_source(ctx, &args.source, &reporter)?;
    let discovered = discovery::inspect(&source.resolved_path)?;

    reporter.heading(&format!("Source {}", source.input));
    reporter.field("path", &source.resolved_path.display().to_string());
    if let Some(commit) = &source.commit {
        reporter.field("commit", commit);
    }
    print(&discovered, &reporter);

    let counts = IssueCounts::of(&discovered.issues, 0);
    if !discovered.is_empty() || !discovered.issues.is_empty() {
        reporter.counts(&[(counts.errors, "errors"), (counts.warnings, "warnings")]);
    } else {
        reporter.warn("Source provides nothing installable");
    }

    reporter.emit_json(&InspectPayload {
        source: &source,
        discovered: &discovered,
        summary: counts,
    })?;

    Ok(Outcome::from_counts(
        counts.errors,
        counts.warnings,
        0,
        ctx.strict(args.output.strict),
    ))
}
