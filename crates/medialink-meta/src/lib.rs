//! Metadata model and configuration for medialink.
//!
//! This crate defines the per-item [`Metadata`] mapping together with the
//! deep-merge rule shared by metadata resolution and configuration
//! composition, and the typed [`SetConfig`] each organizing job runs from.

pub mod config;
pub mod error;
pub mod loader;
pub mod merge;
pub mod metadata;

pub use config::{GroupBy, OutputGroup, ScanMode, SetConfig};
pub use error::{Error, Result};
pub use loader::ConfigFile;
pub use merge::deep_merge;
pub use metadata::Metadata;
