//! Update command implementation
//!
//! Reinstalls what the manifest records, from the same source, for the same
//! tools and in the same mode, with overwrite on. Replaced entries are backed
//! up like any forced install.

use super::install::{Carried, Pipeline, execute, report_executed, report_findings};
use super::{Context, Outcome, resolve_recorded};
use crate::cli::UpdateArgs;
use crate::discovery::{self, DiscoveredSource};
use crate::domain::ComponentKind;
use crate::error::Result;
use crate::selection::Selection;
use crate::ui::Reporter;

/// Split the recorded selection into what the source still provides and
/// what it dropped
fn still_provided(recorded: &Selection, discovered: &DiscoveredSource) -> (Selection, Selection) {
    let mut kept = Selection::default();
    let mut dropped = Selection::default();
    for kind in ComponentKind::ALL {
        let available = discovered.names(kind);
        let (present, gone): (Vec<String>, Vec<String>) = recorded
            .names(kind)
            .iter()
            .cloned()
            .partition(|n| available.contains(n));
        match kind {
            ComponentKind::Agents => (kept.agents, dropped.agents) = (present, gone),
            ComponentKind::Skills => (kept.skills, dropped.skills) = (present, gone),
            ComponentKind::Commands => (kept.commands, dropped.commands) = (present, gone),
            ComponentKind::Files => (kept.files, dropped.files) = (present, gone),
        }
    }
    (kept, dropped)
}

fn dropped_warnings(dropped: &Selection) -> Vec<String> {
    ComponentKind::ALL
        .iter()
        .flat_map(|kind| {
            dropped.names(*kind).iter().map(move |name| {
                format!(
                    "{} '{name}' is no longer provided by the source; kept as installed",
                    kind.singular()
                )
            })
        })
        .collect()
}

/// Run update command
pub fn run(ctx: &Context, args: UpdateArgs) -> Result<Outcome> {
    let reporter = Reporter::new(args.output.json);
    let layout = ctx.layout(&args.scope)?;
    let loaded = ctx.require_manifest(&layout)?;
    let recorded = &loaded.manifest;

    let source = resolve_recorded(ctx, &recorded.source, &reporter)?;
    let discovered = discovery::inspect(&source.resolved_path)?;
    let (selection, dropped) = still_provided(&recorded.selection, &discovered);
    let warnings = dropped_warnings(&dropped);
    report_findings(&discovered.issues, &warnings, &reporter);

    reporter.heading(&format!("Updating from {}", source.input));
    if let (Some(before), Some(after)) = (&recorded.source.commit, &source.commit) {
        reporter.field("Commit", &format!("{before} -> {after}"));
    }

    let pipeline = Pipeline {
        layout: &layout,
        source: &source,
        discovered: &discovered,
        selection: &selection,
        mode: recorded.mode,
        tools: &recorded.tools,
        overwrite: true,
        dry_run: args.dry_run,
        prompter: None,
        // entries the source dropped stay tracked so they remain removable
        carried: (!dropped.is_empty()).then_some(Carried {
            from: recorded,
            names: &dropped,
        }),
    };
    let executed = execute(&pipeline, &reporter)?;

    report_executed(
        &pipeline,
        &executed,
        &discovered.issues,
        &warnings,
        ctx.strict(args.output.strict),
        &reporter,
    )
}
