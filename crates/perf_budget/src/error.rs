//! Error types for budget configuration.

use thiserror::Error;

/// Errors that can occur while loading budget overrides.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Failed to read an overrides file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize overrides
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An override entry is unusable
    #[error("Invalid budget: {0}")]
    InvalidBudget(String),
}

/// Result type for budget configuration.
pub type Result<T> = std::result::Result<T, BudgetError>;
