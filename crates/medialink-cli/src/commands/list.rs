//! List commands for sets and resolvers

use std::path::Path;

use colored::Colorize;
use medialink_resolvers::ResolverRegistry;

use super::load_config;
use crate::error::Result;

/// Run the list-sets command
pub fn run_list_sets(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let sets = config.compose()?;

    println!("{}", "Configured Sets".bold());
    println!();
    if sets.is_empty() {
        println!("  (none)");
        return Ok(());
    }

    for set in sets {
        println!(
            "  {:<14} {} [{}]",
            set.name.green(),
            set.source_dir.display(),
            set.scan_mode
        );
        for group in &set.output {
            println!(
                "    -> {} by {}",
                group.dest.display(),
                group.group_by.fields().join(", ")
            );
        }
    }
    Ok(())
}

/// Run the list-resolvers command
pub fn run_list_resolvers() -> Result<()> {
    let registry = ResolverRegistry::with_builtins();

    println!("{}", "Available Resolvers".bold());
    println!();
    for id in registry.list() {
        println!("  {}", id.green());
    }
    Ok(())
}
