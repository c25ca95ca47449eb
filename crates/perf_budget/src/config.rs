//! Budget overrides loaded from JSON
//!
//! The standard budget set is fixed at build time. Hosts that need different
//! thresholds (slower CI runners, new operations) can describe them in a
//! JSON document and apply it to a catalog with
//! [`BudgetCatalog::apply_overrides`](crate::BudgetCatalog::apply_overrides).
//!
//! ```json
//! {
//!   "budgets": [
//!     { "name": "config_load", "maxDurationNs": 75000000, "priority": "P1" }
//!   ]
//! }
//! ```

use crate::budget::Budget;
use crate::error::{BudgetError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A set of budgets to register on top of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverrides {
    /// Budgets to register, later entries win on duplicate names
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

impl BudgetOverrides {
    /// Create overrides from a list of budgets.
    pub fn new(budgets: Vec<Budget>) -> Self {
        Self { budgets }
    }

    /// Parse and validate overrides from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: Self = serde_json::from_str(json)?;
        overrides.validate()?;
        Ok(overrides)
    }

    /// Read, parse and validate overrides from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every entry can be registered.
    pub fn validate(&self) -> Result<()> {
        match self.budgets.iter().position(|budget| budget.name.trim().is_empty()) {
            Some(index) => Err(BudgetError::InvalidBudget(format!(
                "entry {} has an empty name",
                index
            ))),
            None => Ok(()),
        }
    }

    /// Number of budgets in this set.
    pub fn len(&self) -> usize {
        self.budgets.len()
    }

    /// Check if there are no budgets.
    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }
}
