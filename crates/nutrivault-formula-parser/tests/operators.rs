//! Tests for operator parsing, precedence, and associativity

use nutrivault_formula_ast::{BinaryOp, Expression};
use nutrivault_formula_parser::parse;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn parse_expr(input: &str) -> Expression {
    parse(input)
        .unwrap_or_else(|e| panic!("Failed to parse '{}': {}", input, e))
        .inner
}

fn assert_binary(expr: &Expression) -> (&Expression, BinaryOp, &Expression) {
    match expr {
        Expression::Binary(bin) => (&bin.left.inner, bin.op, &bin.right.inner),
        _ => panic!("Expected Binary, got: {:?}", expr),
    }
}

#[rstest]
#[case("1 + 2", BinaryOp::Add)]
#[case("5 - 3", BinaryOp::Subtract)]
#[case("4 * 3", BinaryOp::Multiply)]
#[case("10 / 2", BinaryOp::Divide)]
fn test_binary_operator(#[case] input: &str, #[case] expected: BinaryOp) {
    let expr = parse_expr(input);
    let (_, op, _) = assert_binary(&expr);
    assert_eq!(op, expected);
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    // 1 + 2 * 3 parses as 1 + (2 * 3)
    let expr = parse_expr("1 + 2 * 3");
    let (left, op, right) = assert_binary(&expr);
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(left, Expression::Number(v) if *v == 1.0));
    let (_, inner_op, _) = assert_binary(right);
    assert_eq!(inner_op, BinaryOp::Multiply);
}

#[test]
fn test_left_associativity() {
    // 10 - 4 - 3 parses as (10 - 4) - 3
    let expr = parse_expr("10 - 4 - 3");
    let (left, op, right) = assert_binary(&expr);
    assert_eq!(op, BinaryOp::Subtract);
    assert!(matches!(right, Expression::Number(v) if *v == 3.0));
    let (_, inner_op, _) = assert_binary(left);
    assert_eq!(inner_op, BinaryOp::Subtract);
}

#[test]
fn test_division_left_associativity() {
    // 100 / 10 / 2 parses as (100 / 10) / 2
    let expr = parse_expr("100 / 10 / 2");
    let (left, op, right) = assert_binary(&expr);
    assert_eq!(op, BinaryOp::Divide);
    assert!(matches!(right, Expression::Number(v) if *v == 2.0));
    let (_, inner_op, _) = assert_binary(left);
    assert_eq!(inner_op, BinaryOp::Divide);
}

#[test]
fn test_parentheses_override_precedence() {
    // (1 + 2) * 3 parses as a Multiply with an Add on the left
    let expr = parse_expr("(1 + 2) * 3");
    let (left, op, _) = assert_binary(&expr);
    assert_eq!(op, BinaryOp::Multiply);
    let (_, inner_op, _) = assert_binary(left);
    assert_eq!(inner_op, BinaryOp::Add);
}

#[test]
fn test_grouping_folds_away() {
    // ((x)) is just the variable; no wrapper nodes survive
    match parse_expr("(({score}))") {
        Expression::Variable(name) => assert_eq!(name, "score"),
        other => panic!("Expected Variable, got: {:?}", other),
    }
}

#[test]
fn test_unary_minus_binds_tighter_than_multiply() {
    // -{a} * {b} parses as (-{a}) * {b}
    let expr = parse_expr("-{a} * {b}");
    let (left, op, _) = assert_binary(&expr);
    assert_eq!(op, BinaryOp::Multiply);
    assert!(matches!(left, Expression::Negate(_)));
}

#[test]
fn test_unary_minus_in_operand_position() {
    // A minus directly after a binary operator negates the operand
    let expr = parse_expr("{a} * -{b}");
    let (_, op, right) = assert_binary(&expr);
    assert_eq!(op, BinaryOp::Multiply);
    assert!(matches!(right, Expression::Negate(_)));
}

#[test]
fn test_bmi_formula_shape() {
    let expr = parse_expr("{weight} / ({height} * {height})");
    let (left, op, right) = assert_binary(&expr);
    assert_eq!(op, BinaryOp::Divide);
    assert!(matches!(left, Expression::Variable(n) if n == "weight"));
    let (_, inner_op, _) = assert_binary(right);
    assert_eq!(inner_op, BinaryOp::Multiply);
}

#[test]
fn test_mixed_variables_and_literals() {
    let expr = parse_expr("{lean_mass} + {fat_mass} * 0.75");
    let (_, op, right) = assert_binary(&expr);
    assert_eq!(op, BinaryOp::Add);
    let (_, inner_op, inner_right) = assert_binary(right);
    assert_eq!(inner_op, BinaryOp::Multiply);
    assert!(matches!(inner_right, Expression::Number(v) if *v == 0.75));
}
