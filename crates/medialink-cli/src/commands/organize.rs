//! The organize command

use std::path::Path;

use colored::Colorize;
use medialink_core::{OrganizeOptions, OrganizeReport, Organizer};
use medialink_resolvers::ResolverRegistry;

use super::load_config;
use crate::error::Result;

/// Run the organize command
pub fn run_organize(config: Option<&Path>, set: Option<String>, ignore_cache: bool) -> Result<()> {
    let config = load_config(config)?;
    let organizer = Organizer::new(ResolverRegistry::with_builtins()).with_options(OrganizeOptions {
        set_name: set,
        ignore_cache,
    });

    let reports = organizer.organize(&config)?;
    if reports.is_empty() {
        println!("{} No sets configured", "warning:".yellow().bold());
    }
    for report in &reports {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &OrganizeReport) {
    let resumed = if report.resumed {
        format!(" (resumed, {} already done)", report.skipped)
    } else {
        String::new()
    };
    println!(
        "{} {}: {} items{}",
        "Organized".green().bold(),
        report.set.cyan(),
        report.processed,
        resumed
    );
    if report.unknown > 0 {
        println!("  {} unknown item events", report.unknown.to_string().yellow());
    }
    if report.crashed > 0 {
        println!("  {} resolver failures", report.crashed.to_string().red());
    }
    if report.failed > 0 {
        println!("  {} items could not be linked", report.failed.to_string().red());
    }

    match &report.cleanup {
        None => println!("  cleanup skipped"),
        Some(cleanup) => {
            let verb = if cleanup.dry_run { "would remove" } else { "removed" };
            println!(
                "  cleanup {} {} links, {} directories",
                verb,
                cleanup.removed_links.len(),
                cleanup.removed_dirs.len()
            );
            for path in &cleanup.kept {
                println!("  {} {}", "kept".yellow(), path.display());
            }
        }
    }
}
