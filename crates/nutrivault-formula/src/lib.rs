//! Calculated custom-field formula engine for NutriVault
//!
//! This crate is the library boundary the surrounding clinic-management
//! system consumes. It provides:
//! - Parsing of administrator-authored formulas like
//!   `{weight} / ({height} * {height})`
//! - Dependency extraction, cycle rejection, and authoring limits
//! - Per-subject evaluation with round-half-up output rounding
//! - Incremental recalculation when an input value changes
//! - The synchronous validation contract backing the formula-editor UI
//!
//! # Example
//!
//! ```
//! use nutrivault_formula::{
//!     DependencyGraph, FormulaDefinition, MemoryStore, SubjectId, recalculate,
//! };
//!
//! let graph = DependencyGraph::build([FormulaDefinition::new(
//!     "3b1f6f2a-0001-4c58-9d20-5d6a7f2b9c01",
//!     "bmi",
//!     "{weight} / ({height} * {height})",
//!     2,
//! )
//! .unwrap()])
//! .unwrap();
//!
//! let subject = SubjectId::new("patient-1");
//! let mut store = MemoryStore::new()
//!     .with_value("weight", &subject, 70.0)
//!     .with_value("height", &subject, 1.75);
//!
//! let result = recalculate("weight", &graph, &mut store, &subject);
//! assert_eq!(result.updated["bmi"], 22.86);
//! ```

// Re-export all public APIs from internal crates
pub use nutrivault_formula_ast as ast;
pub use nutrivault_formula_diagnostics as diagnostics;
pub use nutrivault_formula_eval as eval;
pub use nutrivault_formula_graph as graph;
pub use nutrivault_formula_parser as parser;

// Convenience re-exports
pub use nutrivault_formula_ast::{BinaryOp, Expression};
pub use nutrivault_formula_diagnostics::{FormulaError, Result};
pub use nutrivault_formula_eval::{
    Environment, EvalError, MemoryStore, RecalcResult, SubjectId, ValueStore, evaluate,
    evaluate_rounded, recalculate,
};
pub use nutrivault_formula_graph::{DependencyGraph, DefinitionId, FormulaDefinition};
pub use nutrivault_formula_parser::{parse, parse_cached};

mod validation;
pub use validation::{ValidationOutcome, validate_formula};
