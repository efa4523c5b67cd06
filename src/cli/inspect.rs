use clap::Parser;

use super::shared::OutputArgs;

/// Arguments for the inspect command
#[derive(Parser, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                   List what a repository provides:\n    agntx inspect acme/agents\n\n\
                   Validate a local pack in CI:\n    agntx validate ./pack --strict --json")]
pub struct InspectArgs {
    /// Source to inspect (same formats as install)
    pub source: String,

    #[command(flatten)]
    pub output: OutputArgs,
}
