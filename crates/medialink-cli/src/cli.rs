//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// medialink - Organize a media collection into symlink views
#[derive(Parser, Debug)]
#[command(name = "medialink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (TOML, JSON or YAML)
    #[arg(short, long, global = true, env = "MEDIALINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Scan sources and rebuild the symlink views
    ///
    /// Examples:
    ///   medialink organize                 # Every configured set
    ///   medialink organize --set movies    # Only the "movies" set
    Organize {
        /// Only organize the set with this name
        #[arg(short, long)]
        set: Option<String>,

        /// Do not read cached metadata
        #[arg(long)]
        ignore_cache: bool,
    },

    /// List configured sets
    ListSets,

    /// List available resolvers
    ListResolvers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_organize_with_set() {
        let cli = Cli::parse_from(["medialink", "organize", "--set", "movies", "--ignore-cache"]);
        assert_eq!(
            cli.command,
            Some(Commands::Organize {
                set: Some("movies".into()),
                ignore_cache: true,
            })
        );
    }

    #[test]
    fn parse_global_flags_after_command() {
        let cli = Cli::parse_from(["medialink", "list-sets", "-v", "-c", "media.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("media.toml")));
        assert_eq!(cli.command, Some(Commands::ListSets));
    }

    #[test]
    fn parse_no_command() {
        let cli = Cli::parse_from(["medialink"]);
        assert!(cli.command.is_none());
    }
}
