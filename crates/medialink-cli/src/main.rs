//! medialink CLI
//!
//! Builds symlink views of a media collection from the sets in a config file.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(Commands::Organize { set, ignore_cache }) => {
            commands::run_organize(cli.config.as_deref(), set, ignore_cache)
        }
        Some(Commands::ListSets) => commands::run_list_sets(cli.config.as_deref()),
        Some(Commands::ListResolvers) => commands::run_list_resolvers(),
        None => {
            println!("{} Media collection organizer", "medialink".green().bold());
            println!();
            println!("Run {} for available commands.", "medialink --help".cyan());
            Ok(())
        }
    }
}
