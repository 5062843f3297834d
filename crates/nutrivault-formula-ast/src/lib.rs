//! Abstract syntax tree for NutriVault calculated-field formulas
//!
//! A formula is a small arithmetic expression over curly-brace variable
//! references, e.g. `{weight} / ({height} * {height})`. The tree encodes
//! operator precedence directly; grouping parentheses are folded away
//! during parsing.

mod expression;
mod operator;

pub use expression::*;
pub use operator::*;

/// A node with source span information
pub type Spanned<T> = nutrivault_formula_diagnostics::Spanned<T>;

/// Type alias for boxed expressions
pub type BoxExpr = Box<Spanned<Expression>>;
