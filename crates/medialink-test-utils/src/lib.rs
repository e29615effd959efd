//! Shared test utilities for the medialink workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`resolver`]: [`MemoryResolver`], a resolver whose answers tests set
//!   between runs
//! - [`set`]: [`TestSet`] builder for a temporary source/destination layout

pub mod resolver;
pub mod set;

pub use resolver::{Behavior, MemoryResolver};
pub use set::TestSet;
