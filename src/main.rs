//! agntx - agent installer
//!
//! Installs agents, skills, commands and file groups from git repositories
//! or local folders into the configuration directories of Claude and Cursor,
//! and keeps track of what it installed.

use clap::Parser;
use miette::Diagnostic;

mod cache;
mod cli;
mod commands;
mod common;
mod config;
mod discovery;
mod domain;
mod error;
mod git;
mod hash;
mod installer;
mod lock;
mod logging;
mod manifest;
mod path_utils;
mod prompt;
mod removal;
mod selection;
mod source;
mod ui;
mod validate;

use cli::{Cli, Commands};
use commands::{Context, Outcome};
use config::Settings;
use error::Result;

fn dispatch(cli: Cli) -> Result<Outcome> {
    let settings = Settings::load()?;
    let ctx = Context::new(settings, cli.workspace)?;

    match cli.command {
        Commands::Install(args) => commands::install::run(&ctx, args),
        Commands::Inspect(args) => commands::inspect::run(&ctx, args),
        Commands::Status(args) => commands::status::run(&ctx, args),
        Commands::Remove(args) => commands::remove::run(&ctx, args),
        Commands::Init(args) => commands::init::run(&ctx, args),
        Commands::Check(args) => commands::check::run(&ctx, args),
        Commands::Update(args) => commands::update::run(&ctx, args),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match dispatch(cli) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(help) = e.help() {
                eprintln!("  help: {}", help);
            }
            std::process::exit(1);
        }
    }
}
