use clap::Parser;

use super::shared::{OutputArgs, ScopeArgs};

/// Arguments for the update command
#[derive(Parser, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                   Refresh the project install:\n    agntx update\n\n\
                   Preview the refresh:\n    agntx update --dry-run")]
pub struct UpdateArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Show what would be replaced without writing anything
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}
