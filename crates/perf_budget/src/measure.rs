//! Evaluation of observed samples against budgets

use crate::budget::duration_nanos;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A dimension a budget constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Wall-clock time
    Duration,
    /// Allocation count
    Allocations,
    /// Bytes used
    Bytes,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dimension::Duration => "duration",
            Dimension::Allocations => "allocations",
            Dimension::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

/// The outcome of evaluating one sample against a budget.
///
/// Observed values are echoed back unchanged, including for operations
/// that have no registered budget. When read back from JSON the overall
/// verdict is recomputed from the per-dimension verdicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "MeasurementRecord")]
pub struct MeasurementResult {
    /// Name of the evaluated operation
    pub operation: String,
    /// Observed duration
    #[serde(rename = "durationNs", with = "duration_nanos")]
    pub duration: Duration,
    /// Observed allocation count
    pub allocations: u64,
    /// Observed byte count
    pub bytes: u64,
    /// Whether the duration is within budget
    pub passes_duration: bool,
    /// Whether the allocation count is within budget
    pub passes_allocations: bool,
    /// Whether the byte count is within budget
    pub passes_bytes: bool,
    /// Overall verdict, all dimensions pass
    pub passes: bool,
}

/// Serialized form of a result; `passes` is derived, never read.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeasurementRecord {
    operation: String,
    #[serde(rename = "durationNs", with = "duration_nanos")]
    duration: Duration,
    allocations: u64,
    bytes: u64,
    passes_duration: bool,
    passes_allocations: bool,
    passes_bytes: bool,
}

impl From<MeasurementRecord> for MeasurementResult {
    fn from(record: MeasurementRecord) -> Self {
        Self::new(
            record.operation,
            record.duration,
            record.allocations,
            record.bytes,
            record.passes_duration,
            record.passes_allocations,
            record.passes_bytes,
        )
    }
}

impl MeasurementResult {
    pub(crate) fn new(
        operation: String,
        duration: Duration,
        allocations: u64,
        bytes: u64,
        passes_duration: bool,
        passes_allocations: bool,
        passes_bytes: bool,
    ) -> Self {
        Self {
            operation,
            duration,
            allocations,
            bytes,
            passes_duration,
            passes_allocations,
            passes_bytes,
            passes: passes_duration && passes_allocations && passes_bytes,
        }
    }

    /// Result for an operation with no registered budget. Always passes.
    pub fn unbudgeted(operation: impl Into<String>, duration: Duration, allocations: u64, bytes: u64) -> Self {
        Self::new(operation.into(), duration, allocations, bytes, true, true, true)
    }

    /// Dimensions that exceeded their ceiling, in declaration order.
    pub fn failed_dimensions(&self) -> Vec<Dimension> {
        [
            (Dimension::Duration, self.passes_duration),
            (Dimension::Allocations, self.passes_allocations),
            (Dimension::Bytes, self.passes_bytes),
        ]
        .into_iter()
        .filter(|(_, passes)| !passes)
        .map(|(dimension, _)| dimension)
        .collect()
    }

    /// Observed duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

impl std::fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.passes {
            write!(f, "{}: PASS", self.operation)?;
        } else {
            let failed: Vec<String> = self.failed_dimensions().iter().map(|d| d.to_string()).collect();
            write!(f, "{}: FAIL [{}]", self.operation, failed.join(", "))?;
        }
        write!(
            f,
            " ({:.2}ms, {} allocs, {} bytes)",
            self.duration_ms(),
            self.allocations,
            self.bytes
        )
    }
}
