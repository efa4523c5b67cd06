use clap::Parser;

use super::shared::{OutputArgs, ScopeArgs};

/// Arguments for the check command
#[derive(Parser, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                   Is anything out of date?\n    agntx check\n\n\
                   Fail CI when it is:\n    agntx check --strict")]
pub struct CheckArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use crate::domain::Scope;

    #[test]
    fn test_cli_parsing_check() {
        let cli = super::super::Cli::try_parse_from(["agntx", "check", "--scope", "global", "--json"])
            .unwrap_or_else(|e| {
                panic!("Failed to parse CLI arguments: {}", e);
            });
        match cli.command {
            super::super::Commands::Check(args) => {
                assert_eq!(args.scope.scope, Some(Scope::Global));
                assert!(args.output.json);
            }
            _ => panic!("Expected Check command"),
        }
    }
}
