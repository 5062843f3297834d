//! Expression tree nodes for calculated-field formulas

use crate::{BinaryOp, BoxExpr, Spanned, UNARY_PRECEDENCE};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A formula expression
///
/// A well-formed tree contains no unresolved operator nodes; parse errors
/// produce no tree at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Numeric literal (integer or decimal source form, IEEE-754 double)
    Number(f64),
    /// Reference to another field or measure, written `{name}` in source
    Variable(String),
    /// Binary arithmetic operation
    Binary(BinaryExpr),
    /// Unary minus
    Negate(BoxExpr),
}

/// A binary operation node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    /// The operator
    pub op: BinaryOp,
    /// Left operand
    pub left: BoxExpr,
    /// Right operand
    pub right: BoxExpr,
}

impl Expression {
    /// Build a binary node from already-spanned operands
    pub fn binary(op: BinaryOp, left: Spanned<Expression>, right: Spanned<Expression>) -> Self {
        Self::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Collect every variable referenced anywhere in the tree
    ///
    /// Duplicates are removed; the set preserves first-reference order.
    pub fn variables(&self) -> IndexSet<String> {
        let mut out = IndexSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut IndexSet<String>) {
        match self {
            Self::Number(_) => {}
            Self::Variable(name) => {
                out.insert(name.clone());
            }
            Self::Binary(bin) => {
                bin.left.inner.collect_variables(out);
                bin.right.inner.collect_variables(out);
            }
            Self::Negate(operand) => operand.inner.collect_variables(out),
        }
    }

    /// Check whether the tree references the given variable
    pub fn references(&self, name: &str) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Variable(v) => v == name,
            Self::Binary(bin) => {
                bin.left.inner.references(name) || bin.right.inner.references(name)
            }
            Self::Negate(operand) => operand.inner.references(name),
        }
    }

    /// Precedence of this node when rendered back to source
    fn render_precedence(&self) -> u8 {
        match self {
            Self::Number(_) | Self::Variable(_) => u8::MAX,
            Self::Binary(bin) => bin.op.precedence(),
            Self::Negate(_) => UNARY_PRECEDENCE,
        }
    }

    fn write_normalized(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        let prec = self.render_precedence();
        let parenthesize = prec < min_prec;
        if parenthesize {
            f.write_str("(")?;
        }
        match self {
            Self::Number(value) => write!(f, "{value}")?,
            Self::Variable(name) => write!(f, "{{{name}}}")?,
            Self::Binary(bin) => {
                // Left-associative: the right operand needs parens at equal
                // precedence, the left does not.
                bin.left.inner.write_normalized(f, prec)?;
                write!(f, " {} ", bin.op)?;
                bin.right.inner.write_normalized(f, prec + 1)?;
            }
            Self::Negate(operand) => {
                f.write_str("-")?;
                operand.inner.write_normalized(f, UNARY_PRECEDENCE)?;
            }
        }
        if parenthesize {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Normalized source rendering
///
/// Re-parsing the rendered string yields a tree that evaluates identically
/// for every environment; grouping parentheses are emitted only where the
/// tree shape requires them.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_normalized(f, 0)
    }
}
