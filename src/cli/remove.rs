use clap::Parser;

use super::shared::{OutputArgs, ScopeArgs, ToolsArgs};
use crate::domain::ComponentKind;

/// Arguments for the remove command
#[derive(Parser, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                   Pick interactively:\n    agntx remove\n\n\
                   Remove one agent from Cursor only:\n    agntx remove reviewer --kind agents --tools cursor\n\n\
                   Remove everything without asking:\n    agntx rm --all --yes")]
pub struct RemoveArgs {
    /// Component names to remove (all kinds unless --kind is given)
    pub names: Vec<String>,

    /// Only remove components of these kinds
    #[arg(long, short = 'k', value_enum, value_delimiter = ',', value_name = "KIND")]
    pub kind: Vec<ComponentKind>,

    #[command(flatten)]
    pub tools: ToolsArgs,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Remove every tracked component matching the filters
    #[arg(long, conflicts_with = "names")]
    pub all: bool,

    /// Show what would be removed without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}
