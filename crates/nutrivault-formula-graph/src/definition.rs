//! Calculated-field formula definitions

use indexmap::IndexSet;
use nutrivault_formula_ast::{Expression, Spanned};
use nutrivault_formula_diagnostics::{
    FML0101, FML0103, FML0104, FormulaError, Result,
};
use nutrivault_formula_parser::parse_cached;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Maximum formula source length in bytes
///
/// Enforced at authoring time so one save cannot create an arbitrarily
/// expensive recalculation.
pub const MAX_EXPRESSION_LENGTH: usize = 1024;

/// Maximum number of distinct variables one formula may reference
pub const MAX_DEPENDENCIES: usize = 32;

/// Opaque identifier for a formula definition (UUID-shaped in practice)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefinitionId(String);

impl DefinitionId {
    /// Wrap an identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DefinitionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DefinitionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Wire shape used when loading a definition from JSON
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDefinition {
    id: String,
    name: String,
    expression: String,
    decimal_places: u32,
}

/// One calculated field or measure
///
/// `expression` and the derived fields are kept consistent by construction:
/// every create or update re-parses, re-extracts dependencies, and re-checks
/// authoring limits synchronously. The evaluator never mutates a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDefinition", rename_all = "camelCase")]
pub struct FormulaDefinition {
    /// Opaque identifier
    pub id: DefinitionId,
    /// Variable name other formulas may reference; unique within its scope
    pub name: String,
    /// Raw formula source
    expression: String,
    /// Variables referenced by `expression`, in first-reference order
    dependencies: IndexSet<String>,
    /// Output rounding precision
    pub decimal_places: u32,
    /// Parsed tree, shared with the parse cache
    #[serde(skip_serializing)]
    parsed: Arc<Spanned<Expression>>,
}

impl FormulaDefinition {
    /// Create a definition, validating the expression synchronously
    ///
    /// Rejects oversized expressions, malformed syntax, self-references,
    /// and formulas exceeding the dependency limit. Nothing about an
    /// invalid formula is retained.
    pub fn new(
        id: impl Into<DefinitionId>,
        name: impl Into<String>,
        expression: impl Into<String>,
        decimal_places: u32,
    ) -> Result<Self> {
        let name = name.into();
        let expression = expression.into();
        let (parsed, dependencies) = derive_expression(&name, &expression)?;

        Ok(Self {
            id: id.into(),
            name,
            expression,
            dependencies,
            decimal_places,
            parsed,
        })
    }

    /// The raw formula source
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The parsed expression tree
    pub fn expression_tree(&self) -> &Spanned<Expression> {
        &self.parsed
    }

    /// Variables this formula reads, in first-reference order
    pub fn dependencies(&self) -> &IndexSet<String> {
        &self.dependencies
    }

    /// Replace the formula source, re-deriving dependencies
    ///
    /// On error the definition is left unchanged.
    pub fn set_expression(&mut self, expression: impl Into<String>) -> Result<()> {
        let expression = expression.into();
        let (parsed, dependencies) = derive_expression(&self.name, &expression)?;
        self.expression = expression;
        self.dependencies = dependencies;
        self.parsed = parsed;
        Ok(())
    }
}

impl TryFrom<RawDefinition> for FormulaDefinition {
    type Error = FormulaError;

    fn try_from(raw: RawDefinition) -> Result<Self> {
        Self::new(
            DefinitionId::new(raw.id),
            raw.name,
            raw.expression,
            raw.decimal_places,
        )
    }
}

/// Parse and validate an expression for the named formula
fn derive_expression(
    name: &str,
    expression: &str,
) -> Result<(Arc<Spanned<Expression>>, IndexSet<String>)> {
    if expression.len() > MAX_EXPRESSION_LENGTH {
        return Err(FormulaError::validation(
            FML0103,
            format!(
                "expression is {} bytes, limit is {MAX_EXPRESSION_LENGTH}",
                expression.len()
            ),
        ));
    }

    let parsed = parse_cached(expression)?;
    let dependencies = parsed.inner.variables();

    if dependencies.contains(name) {
        return Err(FormulaError::validation(
            FML0101,
            format!("formula '{name}' references itself"),
        ));
    }
    if dependencies.len() > MAX_DEPENDENCIES {
        return Err(FormulaError::validation(
            FML0104,
            format!(
                "formula '{name}' references {} variables, limit is {MAX_DEPENDENCIES}",
                dependencies.len()
            ),
        ));
    }

    Ok((parsed, dependencies))
}
