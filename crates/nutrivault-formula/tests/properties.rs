//! Property-based tests for the engine's core guarantees

use nutrivault_formula::diagnostics::{FML0102, Span};
use nutrivault_formula::{
    BinaryOp, DependencyGraph, Environment, Expression, FormulaDefinition, evaluate, parse,
};
use proptest::prelude::*;

type SpannedExpr = nutrivault_formula::ast::Spanned<Expression>;

fn spanned(expr: Expression) -> SpannedExpr {
    SpannedExpr::new(expr, Span::default())
}

/// Arbitrary well-formed expression trees
fn arb_expression() -> impl Strategy<Value = Expression> {
    let leaf = prop_oneof![
        (0u32..10_000u32).prop_map(|n| Expression::Number(f64::from(n) / 100.0)),
        prop::sample::select(vec!["weight", "height", "a", "b", "c"])
            .prop_map(|name| Expression::Variable(name.to_string())),
    ];

    leaf.prop_recursive(4, 48, 2, |inner| {
        prop_oneof![
            (
                prop::sample::select(vec![
                    BinaryOp::Add,
                    BinaryOp::Subtract,
                    BinaryOp::Multiply,
                    BinaryOp::Divide,
                ]),
                inner.clone(),
                inner.clone(),
            )
                .prop_map(|(op, left, right)| Expression::binary(
                    op,
                    spanned(left),
                    spanned(right)
                )),
            inner.prop_map(|operand| Expression::Negate(Box::new(spanned(operand)))),
        ]
    })
}

fn full_env() -> Environment {
    [
        ("weight", 70.0),
        ("height", 1.75),
        ("a", 3.5),
        ("b", -2.0),
        ("c", 0.0),
    ]
    .into_iter()
    .collect()
}

/// Layered formula sets: v<i> only ever reads v<j> with j < i, so the set
/// is acyclic by construction.
fn arb_layered_definitions() -> impl Strategy<Value = Vec<FormulaDefinition>> {
    prop::collection::vec(prop::collection::vec(any::<prop::sample::Index>(), 0..3), 1..7)
        .prop_map(|layers| {
            layers
                .into_iter()
                .enumerate()
                .map(|(i, picks)| {
                    let mut terms = vec!["{base}".to_string()];
                    for pick in &picks {
                        if i > 0 {
                            terms.push(format!("{{v{}}}", pick.index(i)));
                        }
                    }
                    FormulaDefinition::new(
                        format!("id-{i}"),
                        format!("v{i}"),
                        terms.join(" + "),
                        2,
                    )
                    .unwrap()
                })
                .collect()
        })
}

proptest! {
    /// Rendering a tree and reparsing it reaches a fixpoint immediately.
    #[test]
    fn prop_roundtrip_normalized_fixpoint(expr in arb_expression()) {
        let rendered = expr.to_string();
        let reparsed = parse(&rendered)
            .unwrap_or_else(|e| panic!("rendered formula '{rendered}' failed to parse: {e}"))
            .inner;
        prop_assert_eq!(rendered, reparsed.to_string());
    }

    /// The reparsed tree evaluates exactly like the original, errors included.
    #[test]
    fn prop_roundtrip_preserves_evaluation(expr in arb_expression()) {
        let env = full_env();
        let reparsed = parse(&expr.to_string()).unwrap().inner;
        prop_assert_eq!(evaluate(&expr, &env), evaluate(&reparsed, &env));
    }

    /// Evaluation is a pure function of (tree, environment).
    #[test]
    fn prop_evaluation_deterministic(expr in arb_expression()) {
        let env = full_env();
        let first = evaluate(&expr, &env);
        prop_assert_eq!(evaluate(&expr, &env), first);
    }

    /// Every acyclic formula set builds, and the cached order places each
    /// variable after all of its dependencies.
    #[test]
    fn prop_topological_order_respects_dependencies(defs in arb_layered_definitions()) {
        let graph = DependencyGraph::build(defs.clone()).unwrap();
        let order = graph.topological_order();
        let pos = |name: &str| {
            order
                .iter()
                .position(|n| n == name)
                .unwrap_or_else(|| panic!("{name} missing from order"))
        };
        for def in &defs {
            for dep in def.dependencies() {
                prop_assert!(pos(dep) < pos(&def.name));
            }
        }
    }

    /// Closing any chain into a loop is always rejected with the full path.
    #[test]
    fn prop_cycles_always_rejected(len in 2usize..6) {
        let mut defs: Vec<FormulaDefinition> = (1..len)
            .map(|i| {
                FormulaDefinition::new(
                    format!("id-{i}"),
                    format!("v{i}"),
                    format!("{{v{}}} + 1", i - 1),
                    2,
                )
                .unwrap()
            })
            .collect();
        defs.push(
            FormulaDefinition::new("id-0", "v0", format!("{{v{}}} + 1", len - 1), 2).unwrap(),
        );

        let err = DependencyGraph::build(defs).unwrap_err();
        prop_assert_eq!(err.code(), FML0102);
        prop_assert_eq!(err.cycle_path().unwrap().len(), len);
    }
}
