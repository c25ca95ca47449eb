//! Performance budgets

use crate::measure::MeasurementResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Standard priority levels.
///
/// Priorities are an open set; these are the levels used by the standard
/// catalog. They carry no enforcement semantics and exist for filtering.
pub mod priority {
    /// Critical path, regressions block a release.
    pub const P0: &str = "P0";
    /// Important, regressions should be investigated.
    pub const P1: &str = "P1";
    /// Baseline or informational.
    pub const P2: &str = "P2";
}

/// A named performance contract.
///
/// A budget declares the maximum acceptable duration for an operation and,
/// optionally, ceilings on the number of allocations and bytes it may use.
/// A ceiling of zero means the dimension is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Unique operation name, used as the catalog key
    pub name: String,
    /// Maximum acceptable wall-clock time (inclusive), serialized as
    /// nanoseconds; must fit in a `u64`
    #[serde(rename = "maxDurationNs", with = "duration_nanos")]
    pub max_duration: Duration,
    /// Maximum allocation count, 0 for no limit
    #[serde(default)]
    pub max_allocations: u64,
    /// Maximum bytes used, 0 for no limit
    #[serde(default)]
    pub max_bytes: u64,
    /// Priority level (e.g. "P0", "P1", "P2")
    pub priority: String,
    /// Human readable explanation
    #[serde(default)]
    pub description: String,
}

impl Budget {
    /// Create a duration-only budget.
    pub fn new(name: impl Into<String>, max_duration: Duration, priority: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_duration,
            max_allocations: 0,
            max_bytes: 0,
            priority: priority.into(),
            description: String::new(),
        }
    }

    /// Builder method to set the allocation ceiling.
    pub fn with_max_allocations(mut self, max: u64) -> Self {
        self.max_allocations = max;
        self
    }

    /// Builder method to set the byte ceiling.
    pub fn with_max_bytes(mut self, max: u64) -> Self {
        self.max_bytes = max;
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the allocation count is constrained.
    pub fn has_allocation_limit(&self) -> bool {
        self.max_allocations != 0
    }

    /// Whether the byte count is constrained.
    pub fn has_byte_limit(&self) -> bool {
        self.max_bytes != 0
    }

    /// Check a duration against this budget.
    pub fn check_duration(&self, duration: Duration) -> bool {
        duration <= self.max_duration
    }

    /// Check an allocation count against this budget.
    pub fn check_allocations(&self, allocations: u64) -> bool {
        !self.has_allocation_limit() || allocations <= self.max_allocations
    }

    /// Check a byte count against this budget.
    pub fn check_bytes(&self, bytes: u64) -> bool {
        !self.has_byte_limit() || bytes <= self.max_bytes
    }

    /// Get the remaining time for a measured duration.
    ///
    /// Returns `None` when the measurement is over budget.
    pub fn duration_headroom(&self, duration: Duration) -> Option<Duration> {
        self.max_duration.checked_sub(duration)
    }

    /// Evaluate an observed sample against this budget.
    pub fn evaluate(&self, duration: Duration, allocations: u64, bytes: u64) -> MeasurementResult {
        MeasurementResult::new(
            self.name.clone(),
            duration,
            allocations,
            bytes,
            self.check_duration(duration),
            self.check_allocations(allocations),
            self.check_bytes(bytes),
        )
    }
}

/// Serialize a `Duration` as whole nanoseconds.
///
/// Durations longer than `u64::MAX` nanoseconds (about 584 years) are
/// rejected rather than truncated.
pub(crate) mod duration_nanos {
    use serde::ser::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(duration.as_nanos()).map_err(|_| {
            S::Error::custom(format!("duration {:?} exceeds u64 nanoseconds", duration))
        })?;
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
