//! Formula error codes following a structured numbering system
//!
//! Error code ranges:
//! - FML0001-FML0099: Parse errors (syntax)
//! - FML0100-FML0199: Validation errors (references, limits, graph shape)
//! - FML0200-FML0299: Evaluation errors (runtime)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get a short description of this error code
    pub const fn description(&self) -> &'static str {
        match self.0 {
            1 => "Invalid character or unexpected token",
            2 => "Empty expression",
            3 => "Unterminated variable reference",
            4 => "Unmatched parenthesis",
            5 => "Expected operand",
            101 => "Formula references its own name",
            102 => "Dependency cycle between formulas",
            103 => "Expression exceeds the maximum length",
            104 => "Formula exceeds the maximum dependency count",
            105 => "Duplicate definition name",
            201 => "Variable has no value in the evaluation environment",
            202 => "Division by zero",
            203 => "Arithmetic overflow",
            _ => "Unknown error",
        }
    }

    /// Check if this is a parse error (0001-0099)
    pub const fn is_parse_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a validation error (0100-0199)
    pub const fn is_validation_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is an evaluation error (0200-0299)
    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FML{:04}", self.0)
    }
}

/// Invalid character or unexpected token
pub const FML0001: ErrorCode = ErrorCode::new(1);
/// Empty expression
pub const FML0002: ErrorCode = ErrorCode::new(2);
/// Unterminated `{name}` variable reference
pub const FML0003: ErrorCode = ErrorCode::new(3);
/// Unmatched parenthesis
pub const FML0004: ErrorCode = ErrorCode::new(4);
/// Expected operand (consecutive or trailing operator)
pub const FML0005: ErrorCode = ErrorCode::new(5);

/// Formula references its own name
pub const FML0101: ErrorCode = ErrorCode::new(101);
/// Dependency cycle between formulas
pub const FML0102: ErrorCode = ErrorCode::new(102);
/// Expression exceeds the maximum length
pub const FML0103: ErrorCode = ErrorCode::new(103);
/// Formula exceeds the maximum dependency count
pub const FML0104: ErrorCode = ErrorCode::new(104);
/// Duplicate definition name within one scope
pub const FML0105: ErrorCode = ErrorCode::new(105);

/// Variable missing from the evaluation environment
pub const FML0201: ErrorCode = ErrorCode::new(201);
/// Division by zero
pub const FML0202: ErrorCode = ErrorCode::new(202);
/// Arithmetic overflow (non-finite result)
pub const FML0203: ErrorCode = ErrorCode::new(203);
