//! Expression parser using recursive descent with precedence climbing
//!
//! Precedence, loosest to tightest: `+`/`-`, then `*`/`/`, then unary minus.
//! Operators of equal precedence bind left-associatively. Grouping
//! parentheses are folded away; the tree shape alone encodes precedence.

use crate::combinators::{Input, PResult, lit, number_parser, variable_parser, ws};
use nutrivault_formula_ast::{BinaryOp, Expression, Spanned};
use nutrivault_formula_diagnostics::Span;
use winnow::combinator::cut_err;
use winnow::prelude::*;

/// Current absolute byte offset, derived from the remaining input length
fn pos(input: &Input<'_>, total: usize) -> usize {
    total - input.len()
}

/// Parse a complete expression (entry point)
///
/// `total` is the byte length of the full source, used to assign absolute
/// spans to nodes while the input slice shrinks.
pub(crate) fn expression<'a>(
    input: &mut Input<'a>,
    total: usize,
) -> PResult<Spanned<Expression>> {
    additive_expression(input, total)
}

/// Parse an additive expression (+, -)
fn additive_expression<'a>(input: &mut Input<'a>, total: usize) -> PResult<Spanned<Expression>> {
    let mut left = multiplicative_expression(input, total)?;

    loop {
        ws.parse_next(input)?;

        let op = if lit("+").parse_next(input).is_ok() {
            Some(BinaryOp::Add)
        } else if lit("-").parse_next(input).is_ok() {
            Some(BinaryOp::Subtract)
        } else {
            None
        };

        if let Some(op) = op {
            let right = multiplicative_expression(input, total)?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expression::binary(op, left, right), span);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse a multiplicative expression (*, /)
fn multiplicative_expression<'a>(
    input: &mut Input<'a>,
    total: usize,
) -> PResult<Spanned<Expression>> {
    let mut left = unary_expression(input, total)?;

    loop {
        ws.parse_next(input)?;

        let op = if lit("*").parse_next(input).is_ok() {
            Some(BinaryOp::Multiply)
        } else if lit("/").parse_next(input).is_ok() {
            Some(BinaryOp::Divide)
        } else {
            None
        };

        if let Some(op) = op {
            let right = unary_expression(input, total)?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expression::binary(op, left, right), span);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse a unary expression (leading minus) or fall through to an atom
///
/// A minus in operand position is unary negation, so `{a} * -{b}` parses;
/// a second *binary* operator in operand position does not.
fn unary_expression<'a>(input: &mut Input<'a>, total: usize) -> PResult<Spanned<Expression>> {
    ws.parse_next(input)?;
    let start = pos(input, total);

    if lit("-").parse_next(input).is_ok() {
        let operand = unary_expression(input, total)?;
        let span = Span::new(start, operand.span.end);
        return Ok(Spanned::new(Expression::Negate(Box::new(operand)), span));
    }

    atom(input, total)
}

/// Parse an atom: number literal, `{name}` reference, or grouped expression
fn atom<'a>(input: &mut Input<'a>, total: usize) -> PResult<Spanned<Expression>> {
    ws.parse_next(input)?;
    let start = pos(input, total);

    if input.starts_with('(') {
        lit("(").parse_next(input)?;
        let inner = expression(input, total)?;
        ws.parse_next(input)?;
        cut_err(lit(")")).parse_next(input)?;
        let end = pos(input, total);
        // Grouping is folded away; the span still covers the parentheses.
        return Ok(Spanned::new(inner.inner, Span::new(start, end)));
    }

    if input.starts_with('{') {
        let name = variable_parser(input)?;
        let end = pos(input, total);
        return Ok(Spanned::new(Expression::Variable(name), Span::new(start, end)));
    }

    let value = number_parser(input)?;
    let end = pos(input, total);
    Ok(Spanned::new(Expression::Number(value), Span::new(start, end)))
}
