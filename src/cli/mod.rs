//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - inspect: Inspect/validate command arguments
//! - status, remove, init, check, update: the remaining commands
//! - shared: scope, output and tool flags used by several commands

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod check;
pub mod init;
pub mod inspect;
pub mod install;
pub mod remove;
pub mod shared;
pub mod status;
pub mod update;

pub use check::CheckArgs;
pub use init::InitArgs;
pub use inspect::InspectArgs;
pub use install::InstallArgs;
pub use remove::RemoveArgs;
pub use status::StatusArgs;
pub use update::UpdateArgs;

/// agntx - agent installer
///
/// Install agents, skills and commands from git repositories or local folders
/// into Claude and Cursor configuration directories.
#[derive(Parser, Debug)]
#[command(
    name = "agntx",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install agents, skills and commands into AI coding tools",
    long_about = "agntx stages agents, skills, commands and file groups from a git repository or \
                  local folder into a canonical .agents directory, then copies or links them into \
                  .claude and .cursor. Everything installed is tracked so it can be checked, \
                  updated and removed later.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  agntx install acme/agents             \x1b[90m# Pick interactively from a GitHub repo\x1b[0m\n   \
                  agntx install ./pack --yes --tools claude \x1b[90m# Everything, Claude only\x1b[0m\n   \
                  agntx status                          \x1b[90m# What is installed, and is it intact?\x1b[0m\n   \
                  agntx check                           \x1b[90m# Compare against the source\x1b[0m\n   \
                  agntx update                          \x1b[90m# Reinstall from the recorded source\x1b[0m\n   \
                  agntx remove reviewer                 \x1b[90m# Remove one component\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Workspace directory for the local scope (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "AGNTX_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install components from a source
    #[command(visible_alias = "add")]
    Install(InstallArgs),

    /// List what a source provides and report structural issues
    #[command(visible_alias = "validate")]
    Inspect(InspectArgs),

    /// Show installed components and integrity issues
    Status(StatusArgs),

    /// Remove installed components
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),

    /// Scaffold a new source layout
    Init(InitArgs),

    /// Compare installed components against their source
    Check(CheckArgs),

    /// Reinstall from the recorded source
    Update(UpdateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_status() {
        let cli = Cli::try_parse_from(["agntx", "status"]).unwrap();
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from(["agntx", "-v", "-w", "/tmp/workspace", "status"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/workspace")));
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["agntx", "check", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["agntx"]).is_err());
    }

    #[test]
    fn test_cli_install_requires_source() {
        assert!(Cli::try_parse_from(["agntx", "install"]).is_err());
    }

    #[test]
    fn test_cli_invalid_scope_lists_values() {
        let err = Cli::try_parse_from(["agntx", "status", "--scope", "system"])
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();
        assert!(err.contains("global"));
        assert!(err.contains("local"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
