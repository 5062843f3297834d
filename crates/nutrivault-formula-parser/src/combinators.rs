//! Common parser combinators for formula source

use winnow::ascii::digit1;
use winnow::combinator::{cut_err, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{literal, take_while};

/// Parser input: a plain string slice, consumed left to right
pub(crate) type Input<'a> = &'a str;

/// Parser result with backtracking support
pub(crate) type PResult<T> = winnow::error::ModalResult<T>;

/// Skip zero or more whitespace characters
pub(crate) fn ws(input: &mut Input<'_>) -> PResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

/// Match a literal token
pub(crate) fn lit<'a>(
    token: &'static str,
) -> impl Parser<Input<'a>, &'a str, ErrMode<ContextError>> {
    literal(token)
}

/// Parse a numeric literal (integer or decimal) as an IEEE-754 double
pub(crate) fn number_parser(input: &mut Input<'_>) -> PResult<f64> {
    let text = (digit1, opt(('.', digit1))).take().parse_next(input)?;
    text.parse::<f64>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

/// Parse a variable identifier: letters, digits, and underscores
pub(crate) fn identifier<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

/// Parse a curly-brace variable reference: `{name}`
///
/// Once the opening brace is consumed the name and closing brace are
/// mandatory; failures there are unrecoverable rather than backtracking.
pub(crate) fn variable_parser(input: &mut Input<'_>) -> PResult<String> {
    lit("{").parse_next(input)?;
    let name = cut_err(identifier).parse_next(input)?;
    cut_err(lit("}")).parse_next(input)?;
    Ok(name.to_string())
}
