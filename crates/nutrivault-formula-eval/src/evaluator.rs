//! Tree-walking formula evaluator
//!
//! Arithmetic runs in IEEE-754 doubles. The one deviation from raw float
//! semantics: dividing by an operand that evaluated to exactly zero is an
//! error, never Infinity or NaN. Output rounding is round-half-up
//! (midpoint away from zero), matching how the authoring UI presents
//! results; see [`round_half_up`].

use crate::environment::Environment;
use crate::error::{EvalError, EvalResult};
use nutrivault_formula_ast::{BinaryOp, Expression};
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::*;

/// Evaluate an expression tree against an environment
///
/// Pure: identical `(expr, env)` always produce the identical result or
/// the identical error. A missing variable aborts the whole evaluation;
/// there is no partial or default substitution.
pub fn evaluate(expr: &Expression, env: &Environment) -> EvalResult<f64> {
    match expr {
        Expression::Number(value) => Ok(*value),
        Expression::Variable(name) => env
            .get(name)
            .ok_or_else(|| EvalError::missing_variable(name.as_str())),
        Expression::Binary(bin) => {
            let left = evaluate(&bin.left.inner, env)?;
            let right = evaluate(&bin.right.inner, env)?;

            let value = match bin.op {
                BinaryOp::Add => left + right,
                BinaryOp::Subtract => left - right,
                BinaryOp::Multiply => left * right,
                BinaryOp::Divide => {
                    if right == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    left / right
                }
            };

            if value.is_finite() {
                Ok(value)
            } else {
                Err(EvalError::overflow(bin.op.symbol()))
            }
        }
        Expression::Negate(operand) => Ok(-evaluate(&operand.inner, env)?),
    }
}

/// Evaluate and round the result to `decimal_places`
pub fn evaluate_rounded(
    expr: &Expression,
    env: &Environment,
    decimal_places: u32,
) -> EvalResult<f64> {
    evaluate(expr, env).map(|value| round_half_up(value, decimal_places))
}

/// Round to `decimal_places` with round-half-up semantics
///
/// Midpoints round away from zero: 0.125 -> 0.13 and -0.125 -> -0.13 at
/// two places. Values outside `Decimal`'s range pass through unrounded.
pub fn round_half_up(value: f64, decimal_places: u32) -> f64 {
    match Decimal::from_f64(value) {
        Some(decimal) => decimal
            .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        None => value,
    }
}
