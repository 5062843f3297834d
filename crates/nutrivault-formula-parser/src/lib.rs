//! Formula parser using Winnow
//!
//! This crate turns formula source like `{weight} / ({height} * {height})`
//! into an expression tree, using recursive descent with precedence
//! climbing. Parsing is a pure function of the source text; a shared
//! read-through cache avoids re-parsing the same formula across subjects.

mod cache;
mod combinators;
mod expression;

pub use cache::{cached_expression_count, parse_cached};

use nutrivault_formula_ast::{Expression, Spanned};
use nutrivault_formula_diagnostics::{
    FML0001, FML0002, FML0003, FML0004, FML0005, FormulaError, Result, SourceLocation,
};
use winnow::combinator::eof;
use winnow::prelude::*;

/// Parse formula source into an expression tree
///
/// Fails fast: any syntax error produces a [`FormulaError::Parse`] with a
/// position and no tree at all.
pub fn parse(source: &str) -> Result<Spanned<Expression>> {
    if source.trim().is_empty() {
        return Err(FormulaError::parse_at(
            FML0002,
            "empty expression",
            source,
            SourceLocation::from_offset(0, source),
        ));
    }

    scan_delimiters(source)?;

    let total = source.len();
    let mut top = |input: &mut combinators::Input<'_>| -> std::result::Result<Spanned<Expression>, winnow::error::ErrMode<winnow::error::ContextError>> {
        let expr = expression::expression(input, total)?;
        combinators::ws(input)?;
        eof.parse_next(input)?;
        Ok(expr)
    };

    top.parse(source)
        .map_err(|err| classify_failure(source, err.offset()))
}

/// Check brace and parenthesis pairing before the grammar runs
///
/// These two failure modes get dedicated codes and exact positions, which
/// the grammar alone would report less precisely after backtracking.
fn scan_delimiters(source: &str) -> Result<()> {
    let mut paren_stack: Vec<usize> = Vec::new();
    let mut brace_open: Option<usize> = None;

    for (i, ch) in source.char_indices() {
        match ch {
            '{' => match brace_open {
                None => brace_open = Some(i),
                Some(open) => {
                    return Err(unterminated_reference(source, open));
                }
            },
            '}' => brace_open = None,
            '(' if brace_open.is_none() => paren_stack.push(i),
            ')' if brace_open.is_none() => {
                if paren_stack.pop().is_none() {
                    return Err(FormulaError::parse_at(
                        FML0004,
                        "unmatched closing parenthesis",
                        source,
                        SourceLocation::from_offset(i, source),
                    ));
                }
            }
            _ => {}
        }
    }

    if let Some(open) = brace_open {
        return Err(unterminated_reference(source, open));
    }
    if let Some(&open) = paren_stack.last() {
        return Err(FormulaError::parse_at(
            FML0004,
            "unmatched opening parenthesis",
            source,
            SourceLocation::from_offset(open, source),
        ));
    }

    Ok(())
}

fn unterminated_reference(source: &str, open: usize) -> FormulaError {
    FormulaError::parse_at(
        FML0003,
        "unterminated variable reference",
        source,
        SourceLocation::from_offset(open, source),
    )
}

/// Turn a grammar failure offset into a coded parse error
fn classify_failure(source: &str, offset: usize) -> FormulaError {
    let location = SourceLocation::from_offset(offset.min(source.len()), source);
    let rest = &source[offset.min(source.len())..];

    let Some(found) = rest.chars().next() else {
        // Ran out of input while an operand was still required.
        return FormulaError::parse_at(
            FML0005,
            "expected operand after operator",
            source,
            location,
        );
    };

    match found {
        '+' | '*' | '/' => FormulaError::parse_at(
            FML0005,
            format!("expected operand, found operator '{found}'"),
            source,
            location,
        ),
        ')' => FormulaError::parse_at(FML0005, "expected operand before ')'", source, location),
        '}' => FormulaError::parse_at(FML0003, "malformed variable reference", source, location),
        _ => FormulaError::parse_at(
            FML0001,
            format!("unexpected character '{found}'"),
            source,
            location,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let expr = parse("{weight} / ({height} * {height})").unwrap();
        let variables = expr.inner.variables();
        let vars: Vec<&String> = variables.iter().collect();
        assert_eq!(vars, ["weight", "height"]);
    }

    #[test]
    fn test_parse_error_has_position() {
        let err = parse("{a} $ {b}").unwrap_err();
        assert_eq!(err.code(), FML0001);
        assert_eq!(err.location().unwrap().offset, 4);
    }
}
