//! Evaluation errors
//!
//! These are runtime, per-formula failures. A failing formula leaves its
//! stored value untouched and shows up in `RecalcResult::failed`; sibling
//! formulas keep recalculating.

use nutrivault_formula_diagnostics::{ErrorCode, FML0201, FML0202, FML0203};
use serde::Serialize;
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur while evaluating one formula
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EvalError {
    /// A referenced variable has no value in the environment
    #[error("missing variable: {name}")]
    MissingVariable { name: String },

    /// Division where the right operand evaluated to exactly zero
    #[error("division by zero")]
    DivisionByZero,

    /// Arithmetic produced a non-finite result
    #[error("arithmetic overflow in '{operation}'")]
    Overflow { operation: String },
}

impl EvalError {
    /// Create a missing variable error
    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable { name: name.into() }
    }

    /// Create an overflow error
    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    /// Get the diagnostic error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingVariable { .. } => FML0201,
            Self::DivisionByZero => FML0202,
            Self::Overflow { .. } => FML0203,
        }
    }
}
