//! Arithmetic operators with precedence information

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Precedence 1 (lowest)
    /// Addition
    Add,
    /// Subtraction
    Subtract,

    // Precedence 2
    /// Multiplication
    Multiply,
    /// Division
    Divide,
}

impl BinaryOp {
    /// Get the precedence level (higher binds tighter)
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 1,
            Self::Multiply | Self::Divide => 2,
        }
    }

    /// Get the operator symbol as written in formula source
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// All binary operators bind left-associatively
    pub const fn is_left_associative(&self) -> bool {
        true
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Precedence of unary minus; binds tighter than any binary operator
pub const UNARY_PRECEDENCE: u8 = 3;
