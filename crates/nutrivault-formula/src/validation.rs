//! Synchronous formula validation for the authoring UI
//!
//! This is the externally observable contract the formula editor depends
//! on: given a candidate formula and the definitions already saved in its
//! scope, either confirm it with its dependency list or reject it with a
//! rendered error. A rejection must block persistence; nothing about an
//! invalid formula reaches the graph.

use nutrivault_formula_diagnostics::FormulaError;
use nutrivault_formula_graph::{DependencyGraph, FormulaDefinition};
use serde::Serialize;

/// Result of validating a candidate formula
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Whether the formula may be saved
    pub valid: bool,
    /// Variables the formula reads, in first-reference order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Rendered error when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationOutcome {
    fn accepted(dependencies: Vec<String>) -> Self {
        Self {
            valid: true,
            dependencies,
            error: None,
        }
    }

    fn rejected(error: &FormulaError) -> Self {
        Self {
            valid: false,
            dependencies: Vec::new(),
            error: Some(error.to_diagnostic().to_string()),
        }
    }
}

/// Validate a candidate formula against the existing definitions in scope
///
/// Runs the full authoring pipeline: parse, self-reference and limit
/// checks, then a trial graph build with the candidate in place of any
/// existing definition of the same name (so edits are checked against the
/// graph they would produce, not the one being replaced).
pub fn validate_formula(
    name: &str,
    expression: &str,
    existing: &[FormulaDefinition],
) -> ValidationOutcome {
    let candidate = match FormulaDefinition::new("candidate", name, expression, 0) {
        Ok(candidate) => candidate,
        Err(err) => return ValidationOutcome::rejected(&err),
    };
    let dependencies: Vec<String> = candidate.dependencies().iter().cloned().collect();

    let trial = existing
        .iter()
        .filter(|def| def.name != name)
        .cloned()
        .chain(std::iter::once(candidate));

    match DependencyGraph::build(trial) {
        Ok(_) => ValidationOutcome::accepted(dependencies),
        Err(err) => ValidationOutcome::rejected(&err),
    }
}
