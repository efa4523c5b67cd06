use clap::Parser;

use super::shared::{OutputArgs, ScopeArgs};

/// Arguments for the status command
#[derive(Parser, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                   Project install:\n    agntx status\n\n\
                   Home directory install, machine readable:\n    agntx status --scope global --json")]
pub struct StatusArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parsing_status_path_scope() {
        let cli = super::super::Cli::try_parse_from(["agntx", "status", "--path", "./sandbox"])
            .unwrap_or_else(|e| {
                panic!("Failed to parse CLI arguments: {}", e);
            });
        match cli.command {
            super::super::Commands::Status(args) => {
                assert_eq!(args.scope.scope, None);
                assert_eq!(args.scope.path, Some(PathBuf::from("./sandbox")));
            }
            _ => panic!("Expected Status command"),
        }
    }
}
