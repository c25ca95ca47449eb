//! Performance Budget Registry
//!
//! This crate keeps a catalog of performance budgets for named operations and
//! evaluates measured samples against them:
//! - Budgets with a maximum duration, optional allocation and byte ceilings,
//!   and a priority label
//! - A shared, thread-safe catalog seeded with a standard budget set
//! - Pass/fail evaluation per dimension, with unknown operations passing
//! - JSON overrides for hosts that need different thresholds
//!
//! The crate does not time or profile anything itself. A benchmark harness
//! supplies the observed duration, allocation count and byte count.
//!
//! # Example
//!
//! ```rust
//! use perf_budget::{names, BudgetCatalog, Duration};
//!
//! let catalog = BudgetCatalog::with_defaults();
//!
//! let result = catalog.measure(names::CONTEXT_DETECTION, Duration::from_millis(50), 100, 25 * 1024);
//! assert!(result.passes);
//!
//! let result = catalog.measure(names::CONTEXT_DETECTION, Duration::from_millis(200), 100, 25 * 1024);
//! assert!(!result.passes_duration);
//! ```

mod budget;
mod catalog;
mod config;
pub mod defaults;
mod error;
mod measure;

pub use budget::{priority, Budget};
pub use catalog::BudgetCatalog;
pub use config::BudgetOverrides;
pub use defaults::{names, standard_budgets};
pub use error::{BudgetError, Result};
pub use measure::{Dimension, MeasurementResult};

/// Re-export for convenience
pub use std::time::Duration;
