//! Budget catalog

use crate::budget::Budget;
use crate::config::BudgetOverrides;
use crate::defaults::standard_budgets;
use crate::error::Result;
use crate::measure::MeasurementResult;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// Catalog of performance budgets keyed by operation name.
///
/// This is a handle: clones share the same underlying catalog, so one
/// instance can be built at startup and passed to every component that
/// registers or evaluates budgets. Reads take a shared lock, so concurrent
/// lookups and evaluations do not contend with each other.
#[derive(Debug, Clone)]
pub struct BudgetCatalog {
    inner: Arc<RwLock<HashMap<String, Budget>>>,
}

impl BudgetCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a catalog seeded with the standard budget set.
    pub fn with_defaults() -> Self {
        let budgets = standard_budgets()
            .into_iter()
            .map(|budget| (budget.name.clone(), budget))
            .collect();

        Self {
            inner: Arc::new(RwLock::new(budgets)),
        }
    }

    // Every write is a single insert, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Budget>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Budget>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a budget by exact name.
    ///
    /// A miss is an expected outcome and is reported as `None`.
    pub fn get_budget(&self, name: &str) -> Option<Budget> {
        let budget = self.read().get(name).cloned();
        if budget.is_none() {
            tracing::trace!(target: "perf_budget::catalog", operation = name, "budget not found");
        }
        budget
    }

    /// Look up a budget that the caller knows is registered.
    ///
    /// # Panics
    ///
    /// Panics if no budget is registered under `name`. Use this in setup
    /// code where an unknown name is a programming error.
    #[track_caller]
    pub fn must_get_budget(&self, name: &str) -> Budget {
        match self.get_budget(name) {
            Some(budget) => budget,
            None => panic!("no performance budget registered for operation `{}`", name),
        }
    }

    /// Register a budget, replacing any existing entry with the same name.
    pub fn register_budget(&self, budget: Budget) {
        let name = budget.name.clone();
        let replaced = self.write().insert(name.clone(), budget).is_some();

        tracing::debug!(
            target: "perf_budget::catalog",
            operation = %name,
            replaced,
            "budget registered"
        );
    }

    /// Snapshot of all registered budgets, sorted by name.
    pub fn list_budgets(&self) -> Vec<Budget> {
        let mut budgets: Vec<Budget> = self.read().values().cloned().collect();
        budgets.sort_by(|a, b| a.name.cmp(&b.name));
        budgets
    }

    /// Budgets whose priority exactly equals `priority`, sorted by name.
    pub fn list_by_priority(&self, priority: &str) -> Vec<Budget> {
        let mut budgets: Vec<Budget> = self
            .read()
            .values()
            .filter(|budget| budget.priority == priority)
            .cloned()
            .collect();
        budgets.sort_by(|a, b| a.name.cmp(&b.name));
        budgets
    }

    /// Registered operation names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Check whether a budget is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Number of registered budgets.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the catalog has no budgets.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Evaluate an observed sample against the named budget.
    ///
    /// Operations without a registered budget always pass; the observed
    /// values are still echoed into the result.
    pub fn measure(&self, name: &str, duration: Duration, allocations: u64, bytes: u64) -> MeasurementResult {
        let result = match self.read().get(name) {
            Some(budget) => budget.evaluate(duration, allocations, bytes),
            None => MeasurementResult::unbudgeted(name, duration, allocations, bytes),
        };

        tracing::trace!(
            target: "perf_budget::measure",
            operation = name,
            duration_ms = result.duration_ms(),
            allocations,
            bytes,
            passes = result.passes,
            "measurement evaluated"
        );

        if !result.passes {
            let failed: Vec<String> = result.failed_dimensions().iter().map(|d| d.to_string()).collect();
            tracing::debug!(
                target: "perf_budget::measure",
                operation = name,
                failed = %failed.join(","),
                "measurement over budget"
            );
        }

        result
    }

    /// Register every budget in `overrides` under a single write lock.
    ///
    /// Entries are validated first; if any is invalid nothing is applied.
    /// Returns the number of budgets registered.
    pub fn apply_overrides(&self, overrides: &BudgetOverrides) -> Result<usize> {
        overrides.validate()?;

        let mut catalog = self.write();
        for budget in &overrides.budgets {
            catalog.insert(budget.name.clone(), budget.clone());
        }
        drop(catalog);

        tracing::debug!(
            target: "perf_budget::config",
            count = overrides.budgets.len(),
            "budget overrides applied"
        );

        Ok(overrides.budgets.len())
    }
}

impl Default for BudgetCatalog {
    /// Default catalog contains the standard budget set.
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::priority;
    use crate::defaults::names;

    #[test]
    fn test_new_catalog_is_empty() {
        let catalog = BudgetCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.list_budgets().is_empty());
    }

    #[test]
    fn test_defaults_seeded() {
        let catalog = BudgetCatalog::default();

        assert_eq!(catalog.len(), 6);
        for name in [
            names::CONTEXT_DETECTION,
            names::CONFIG_LOAD,
            names::CONFIG_MERGE,
            names::PLUGIN_DISCOVERY,
            names::STARTUP_TOTAL,
            names::REGISTRY_GET,
        ] {
            assert!(catalog.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_get_budget() {
        let catalog = BudgetCatalog::with_defaults();

        let budget = catalog.get_budget(names::CONTEXT_DETECTION).unwrap();
        assert_eq!(budget.max_duration, Duration::from_millis(100));
        assert_eq!(budget.priority, priority::P0);

        assert_eq!(catalog.get_budget("nonexistent_operation"), None);
    }

    #[test]
    fn test_get_budget_is_exact_match() {
        let catalog = BudgetCatalog::with_defaults();
        assert!(catalog.get_budget("CONTEXT_DETECTION").is_none());
        assert!(catalog.get_budget("context_detection ").is_none());
    }

    #[test]
    fn test_must_get_budget() {
        let catalog = BudgetCatalog::with_defaults();
        let budget = catalog.must_get_budget(names::PLUGIN_DISCOVERY);
        assert_eq!(budget.name, names::PLUGIN_DISCOVERY);
    }

    #[test]
    #[should_panic(expected = "no performance budget registered for operation `missing`")]
    fn test_must_get_budget_panics_on_miss() {
        BudgetCatalog::with_defaults().must_get_budget("missing");
    }

    #[test]
    fn test_register_overwrites() {
        let catalog = BudgetCatalog::new();
        catalog.register_budget(Budget::new("op", Duration::from_millis(10), priority::P1));
        catalog.register_budget(Budget::new("op", Duration::from_millis(20), priority::P2));

        assert_eq!(catalog.len(), 1);
        let budget = catalog.must_get_budget("op");
        assert_eq!(budget.max_duration, Duration::from_millis(20));
        assert_eq!(budget.priority, priority::P2);
    }

    #[test]
    fn test_clones_share_catalog() {
        let catalog = BudgetCatalog::new();
        let handle = catalog.clone();
        handle.register_budget(Budget::new("shared", Duration::from_millis(5), priority::P2));

        assert!(catalog.contains("shared"));
    }

    #[test]
    fn test_poisoned_lock_recovers() {
        let catalog = BudgetCatalog::with_defaults();
        let handle = catalog.clone();

        let outcome = std::thread::spawn(move || {
            let _guard = handle.inner.write().unwrap();
            panic!("writer panicked while holding the lock");
        })
        .join();
        assert!(outcome.is_err());
        assert!(catalog.inner.is_poisoned());

        assert!(catalog.get_budget(names::CONTEXT_DETECTION).is_some());
        catalog.register_budget(Budget::new("after_poison", Duration::from_millis(1), priority::P2));
        assert!(catalog.contains("after_poison"));
        assert_eq!(catalog.len(), 7);
        assert!(catalog.measure(names::CONFIG_LOAD, Duration::from_millis(10), 1, 1).passes);
    }

    #[test]
    fn test_list_budgets_sorted() {
        let names: Vec<String> = BudgetCatalog::with_defaults()
            .list_budgets()
            .into_iter()
            .map(|b| b.name)
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names, BudgetCatalog::with_defaults().names());
    }

    #[test]
    fn test_list_by_priority() {
        let catalog = BudgetCatalog::with_defaults();

        let p0: Vec<String> = catalog
            .list_by_priority(priority::P0)
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(
            p0,
            vec![names::CONTEXT_DETECTION, names::PLUGIN_DISCOVERY, names::STARTUP_TOTAL]
        );

        assert!(catalog.list_by_priority("P9").is_empty());
        assert!(catalog.list_by_priority("p0").is_empty());
    }

    #[test]
    fn test_measure_known_operation() {
        let catalog = BudgetCatalog::with_defaults();

        let result = catalog.measure(names::CONTEXT_DETECTION, Duration::from_millis(50), 100, 25 * 1024);
        assert!(result.passes);

        let result = catalog.measure(names::CONTEXT_DETECTION, Duration::from_millis(200), 100, 25 * 1024);
        assert!(!result.passes_duration);
        assert!(!result.passes);

        let result = catalog.measure(names::CONTEXT_DETECTION, Duration::from_millis(50), 500, 25 * 1024);
        assert!(!result.passes_allocations);
        assert!(!result.passes);
    }

    #[test]
    fn test_measure_unknown_operation_passes() {
        let catalog = BudgetCatalog::with_defaults();
        let result = catalog.measure("unknown_operation", Duration::from_secs(60), u64::MAX, u64::MAX);

        assert!(result.passes);
        assert_eq!(result.operation, "unknown_operation");
        assert_eq!(result.allocations, u64::MAX);
    }

    #[test]
    fn test_measure_duration_only_budget() {
        let catalog = BudgetCatalog::with_defaults();
        let result = catalog.measure(names::REGISTRY_GET, Duration::from_nanos(500), 1_000_000, 1_000_000);

        assert!(result.passes_allocations);
        assert!(result.passes_bytes);
        assert!(result.passes);
    }

    #[test]
    fn test_measure_does_not_mutate() {
        let catalog = BudgetCatalog::with_defaults();
        let before = catalog.list_budgets();
        catalog.measure(names::CONFIG_LOAD, Duration::from_secs(1), 1, 1);
        catalog.measure("not_registered", Duration::from_secs(1), 1, 1);

        assert_eq!(catalog.list_budgets(), before);
        assert!(!catalog.contains("not_registered"));
    }

    #[test]
    fn test_apply_overrides() {
        let catalog = BudgetCatalog::with_defaults();
        let overrides = BudgetOverrides::new(vec![
            Budget::new(names::CONFIG_LOAD, Duration::from_millis(75), priority::P1),
            Budget::new("lint_run", Duration::from_secs(2), priority::P2),
        ]);

        assert_eq!(catalog.apply_overrides(&overrides).unwrap(), 2);
        assert_eq!(catalog.len(), 7);
        assert_eq!(
            catalog.must_get_budget(names::CONFIG_LOAD).max_duration,
            Duration::from_millis(75)
        );
        assert!(catalog.contains("lint_run"));
    }

    #[test]
    fn test_apply_invalid_overrides_is_atomic() {
        let catalog = BudgetCatalog::with_defaults();
        let overrides = BudgetOverrides::new(vec![
            Budget::new("lint_run", Duration::from_secs(2), priority::P2),
            Budget::new("", Duration::from_secs(1), priority::P2),
        ]);

        assert!(catalog.apply_overrides(&overrides).is_err());
        assert!(!catalog.contains("lint_run"));
        assert_eq!(catalog.len(), 6);
    }
}
