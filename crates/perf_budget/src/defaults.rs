//! Standard budget set
//!
//! These entries seed every catalog built with
//! [`BudgetCatalog::with_defaults`](crate::BudgetCatalog::with_defaults).
//! Downstream tooling keys on the operation names, so renaming or removing
//! one is a breaking change.

use crate::budget::{priority, Budget};
use std::time::Duration;

/// Names of the standard operations.
pub mod names {
    /// Detecting the project/workspace context.
    pub const CONTEXT_DETECTION: &str = "context_detection";
    /// Loading a single configuration file.
    pub const CONFIG_LOAD: &str = "config_load";
    /// Merging configuration from multiple sources.
    pub const CONFIG_MERGE: &str = "config_merge";
    /// Discovering installed plugins.
    pub const PLUGIN_DISCOVERY: &str = "plugin_discovery";
    /// Full startup, end to end.
    pub const STARTUP_TOTAL: &str = "startup_total";
    /// A single registry lookup.
    pub const REGISTRY_GET: &str = "registry_get";
}

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// Build the standard budget set.
pub fn standard_budgets() -> Vec<Budget> {
    vec![
        Budget::new(names::CONTEXT_DETECTION, Duration::from_millis(100), priority::P0)
            .with_max_allocations(200)
            .with_max_bytes(50 * KIB)
            .with_description("Detect the project context from the working directory"),
        Budget::new(names::CONFIG_LOAD, Duration::from_millis(50), priority::P1)
            .with_max_allocations(500)
            .with_max_bytes(100 * KIB)
            .with_description("Load and parse a single configuration file"),
        Budget::new(names::CONFIG_MERGE, Duration::from_millis(100), priority::P1)
            .with_max_allocations(1000)
            .with_max_bytes(200 * KIB)
            .with_description("Merge configuration from multiple sources"),
        Budget::new(names::PLUGIN_DISCOVERY, Duration::from_millis(200), priority::P0)
            .with_max_allocations(2000)
            .with_max_bytes(512 * KIB)
            .with_description("Discover and index installed plugins"),
        Budget::new(names::STARTUP_TOTAL, Duration::from_millis(500), priority::P0)
            .with_max_allocations(10_000)
            .with_max_bytes(5 * MIB)
            .with_description("Total startup time until ready"),
        // Baseline: duration only.
        Budget::new(names::REGISTRY_GET, Duration::from_micros(1), priority::P2)
            .with_description("Single budget registry lookup"),
    ]
}
