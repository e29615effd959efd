//! Set orchestration
//!
//! Drives one Set through a full run:
//!
//! ```text
//! prepare -> load progress -> for each planned item:
//!                               load cache -> resolve -> save cache
//!                               -> materialize -> record progress
//!         -> reconcile (unless noclean) -> clear progress
//! ```
//!
//! An interrupted run leaves its progress log behind; the next run skips
//! the logged items and only reconciles once every item has been handled.

use medialink_meta::{ConfigFile, SetConfig};
use medialink_resolvers::ResolverRegistry;

use crate::Result;
use crate::cache::MetadataCache;
use crate::events::EventLog;
use crate::output::OutputMaterializer;
use crate::prepare::PreparedSet;
use crate::progress::ProgressTracker;
use crate::reconcile::{CleanupReport, Reconciler};
use crate::resolve::MetadataResolver;
use crate::scan::ScanPlanner;

/// Options that apply to a whole invocation rather than to one Set.
#[derive(Debug, Clone, Default)]
pub struct OrganizeOptions {
    /// Only run the Set with this name
    pub set_name: Option<String>,
    /// Never read cached metadata (results are still written back)
    pub ignore_cache: bool,
}

/// Summary of one Set run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeReport {
    pub set: String,
    /// Items handled by this invocation
    pub processed: usize,
    /// Items skipped because an interrupted run already handled them
    pub skipped: usize,
    /// True when this invocation continued an interrupted run
    pub resumed: bool,
    /// Unknown-item events recorded
    pub unknown: usize,
    /// Crashed-resolver events recorded
    pub crashed: usize,
    /// Items whose links could not be written
    pub failed: usize,
    /// `None` when reconciliation was disabled
    pub cleanup: Option<CleanupReport>,
}

pub struct Organizer {
    registry: ResolverRegistry,
    options: OrganizeOptions,
}

impl Organizer {
    pub fn new(registry: ResolverRegistry) -> Self {
        Self {
            registry,
            options: OrganizeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: OrganizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    /// Run every Set of `config` in order, or only the selected one.
    ///
    /// # Errors
    ///
    /// Stops at the first Set with a configuration error.
    pub fn organize(&self, config: &ConfigFile) -> Result<Vec<OrganizeReport>> {
        let sets = match &self.options.set_name {
            Some(name) => vec![config.compose_named(name)?],
            None => config.compose()?,
        };
        sets.iter().map(|set| self.organize_set(set)).collect()
    }

    /// Run one Set to completion.
    pub fn organize_set(&self, config: &SetConfig) -> Result<OrganizeReport> {
        let set = PreparedSet::prepare(config, &self.registry)?;
        let events = EventLog::new(&set.cache_dir);
        let progress = ProgressTracker::new(&set.cache_dir);

        let processed = progress.load()?;
        let mut report = OrganizeReport {
            set: set.name().to_string(),
            skipped: processed.len(),
            resumed: !processed.is_empty(),
            ..Default::default()
        };
        if report.resumed {
            tracing::info!(set = %set.name(), done = processed.len(), "Resuming organization");
        } else {
            tracing::info!(set = %set.name(), "Beginning to organize");
            events.reset()?;
        }

        let cache = MetadataCache::new(&set.cache_dir, set.config.fingerprint());
        let resolver = MetadataResolver::new(&set, &events);
        let output = OutputMaterializer::new(&set);
        let planner = ScanPlanner::new(&set);

        for item in planner.plan(&processed)? {
            tracing::debug!(item = %item.name, "Organizing item");
            let cached = if self.options.ignore_cache {
                None
            } else {
                cache.load(&item.name)
            };

            let resolution = resolver.resolve(&item, cached);
            report.unknown += resolution.unknown.len();
            report.crashed += resolution.crashed.len();

            if !resolution.from_cache
                && let Err(e) = cache.save(&item, &resolution.metadata)
            {
                tracing::warn!(item = %item.name, error = %e, "Failed to save cache");
            }

            if let Err(e) = output.materialize(&item, &resolution.metadata) {
                tracing::warn!(item = %item.name, error = %e, "Failed to write output");
                report.failed += 1;
            }

            progress.record(&item.name)?;
            report.processed += 1;
        }

        if set.config.noclean {
            tracing::debug!(set = %set.name(), "Skipping cleanup");
        } else {
            report.cleanup = Some(Reconciler::new(&set).run());
        }
        progress.finish()?;

        tracing::info!(
            set = %set.name(),
            processed = report.processed,
            unknown = report.unknown,
            crashed = report.crashed,
            "Finished organizing"
        );
        Ok(report)
    }
}
