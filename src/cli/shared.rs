use clap::Args;
use std::path::PathBuf;

use crate::domain::{Scope, Tool};

/// Which install scope a command works on
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Install scope: global (home directory), local (workspace) or path
    #[arg(long, short = 's', value_enum)]
    pub scope: Option<Scope>,

    /// Base directory for the path scope (implies --scope path)
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,
}

/// Output switches shared by every reporting command
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Print one JSON document instead of colored status lines
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as failures (exit code 2)
    #[arg(long)]
    pub strict: bool,
}

/// Tool filter, comma separated or repeated
#[derive(Args, Debug, Clone, Default)]
pub struct ToolsArgs {
    /// Target tools (e.g. --tools claude,cursor)
    #[arg(long, short = 't', value_enum, value_delimiter = ',', value_name = "TOOL")]
    pub tools: Vec<Tool>,
}
