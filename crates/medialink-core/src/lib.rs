//! Scan, cache and reconcile engine for medialink
//!
//! This crate maintains derived "view" trees of symlinks that classify a
//! source collection by metadata values. It implements:
//!
//! - **Scan planning**: resumable, sorted enumeration of source items
//! - **Metadata cache**: per-item records guarded by a resolver-options fingerprint
//! - **Resolution**: ordered resolver calls combined with the deep-merge rule
//! - **Output**: classification directories, symlinks and manifest (TOC) appends
//! - **Reconciliation**: manifest-based mark-and-sweep of stale entries
//!
//! # Architecture
//!
//! ```text
//!                  medialink-cli
//!                        |
//!                 medialink-core
//!                        |
//!          +-------------+--------------+
//!          |             |              |
//!   medialink-fs  medialink-meta  medialink-resolvers
//! ```
//!
//! # Example
//!
//! ```ignore
//! use medialink_core::{OrganizeOptions, Organizer};
//! use medialink_meta::ConfigFile;
//! use medialink_resolvers::ResolverRegistry;
//!
//! let config = ConfigFile::load("medialink.toml".as_ref())?;
//! let organizer = Organizer::new(ResolverRegistry::with_builtins());
//! for report in organizer.organize(&config)? {
//!     println!("{}: {} items", report.set, report.processed);
//! }
//! ```

pub mod cache;
pub mod error;
pub mod events;
pub mod organizer;
pub mod output;
pub mod prepare;
pub mod progress;
pub mod reconcile;
pub mod resolve;
pub mod scan;
pub mod toc;

pub use cache::MetadataCache;
pub use error::{Error, Result};
pub use events::EventLog;
pub use organizer::{OrganizeOptions, OrganizeReport, Organizer};
pub use output::OutputMaterializer;
pub use prepare::{PreparedResolver, PreparedSet};
pub use progress::ProgressTracker;
pub use reconcile::{CleanupReport, Reconciler};
pub use resolve::{MetadataResolver, Resolution};
pub use scan::{Item, ScanPlanner};
pub use toc::TocDir;
