use clap::Parser;
use std::path::PathBuf;

/// Arguments for the init command
#[derive(Parser, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                   Scaffold in the current directory:\n    agntx init\n\n\
                   Scaffold a new pack:\n    agntx init my-agents")]
pub struct InitArgs {
    /// Directory to scaffold (defaults to the workspace)
    pub dir: Option<PathBuf>,

    /// Print the created paths as JSON
    #[arg(long)]
    pub json: bool,
}
