use clap::Parser;

use super::shared::{OutputArgs, ScopeArgs, ToolsArgs};
use crate::domain::InstallMode;

/// Arguments for the install command
#[derive(Parser, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                   Install everything from GitHub:\n    agntx install acme/agents --yes\n\n\
                   Pick a branch or tag:\n    agntx install acme/agents#v2\n\n\
                   Only some agents, for Claude only:\n    agntx install ./pack --agents reviewer,writer --tools claude\n\n\
                   Every skill into your home directory:\n    agntx install acme/agents --skills --scope global\n\n\
                   Preview without writing:\n    agntx install acme/agents --dry-run")]
pub struct InstallArgs {
    /// Source: ./local/path, owner/repo[#ref], owner/repo/<alias>, https://..., git@host:owner/repo.git
    pub source: String,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// copy or symlink (default: symlink where supported)
    #[arg(long, short = 'm', value_enum)]
    pub mode: Option<InstallMode>,

    #[command(flatten)]
    pub tools: ToolsArgs,

    /// Agents to install (comma separated); bare flag selects all
    #[arg(long, value_name = "NAMES", num_args = 0..=1, default_missing_value = "")]
    pub agents: Option<String>,

    /// Skills to install (comma separated); bare flag selects all
    #[arg(long, value_name = "NAMES", num_args = 0..=1, default_missing_value = "")]
    pub skills: Option<String>,

    /// Commands to install (comma separated); bare flag selects all
    #[arg(long, value_name = "NAMES", num_args = 0..=1, default_missing_value = "")]
    pub commands: Option<String>,

    /// File groups to install (comma separated); bare flag selects all
    #[arg(long, value_name = "NAMES", num_args = 0..=1, default_missing_value = "")]
    pub files: Option<String>,

    /// Overwrite existing targets (replaced entries are backed up)
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Show what would be installed without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Never prompt; select everything not narrowed by flags
    #[arg(long, short = 'y')]
    pub yes: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}
