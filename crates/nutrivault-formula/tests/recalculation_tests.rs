//! End-to-end recalculation scenarios
//!
//! These exercise the whole pipeline the way the host system does: author
//! formulas through validation, build the scope's graph, then push value
//! changes through it per subject.

mod common;

use common::{def, intake_store, patient};
use nutrivault_formula::{
    DependencyGraph, EvalError, MemoryStore, ValueStore, recalculate, validate_formula,
};
use pretty_assertions::assert_eq;

fn clinic_graph() -> DependencyGraph {
    DependencyGraph::build([
        def("bmi", "{weight} / ({height} * {height})", 2),
        def("bmi_delta", "{bmi} - {target_bmi}", 2),
        def("hydration", "{water_intake} / {weight}", 3),
    ])
    .unwrap()
}

#[test]
fn test_weight_change_cascades_in_one_pass() {
    let graph = clinic_graph();
    let subject = patient(1);
    let mut store = intake_store(&subject);

    let result = recalculate("weight", &graph, &mut store, &subject);

    assert!(result.is_complete());
    // bmi must settle before bmi_delta reads it
    let order: Vec<&String> = result.updated.keys().collect();
    assert!(
        order.iter().position(|n| *n == "bmi") < order.iter().position(|n| *n == "bmi_delta")
    );
    assert_eq!(result.updated["bmi"], 22.86);
    assert_eq!(result.updated["bmi_delta"], 1.86);
    assert_eq!(result.updated["hydration"], 0.03);
    assert_eq!(store.read("bmi", &subject), Some(22.86));
}

#[test]
fn test_target_change_touches_only_its_branch() {
    let graph = clinic_graph();
    let subject = patient(1);
    let mut store = intake_store(&subject);

    let result = recalculate("target_bmi", &graph, &mut store, &subject);

    assert_eq!(result.updated.len(), 1);
    assert!(result.updated.contains_key("bmi_delta"));
    assert_eq!(store.read("bmi", &subject), None);
    assert_eq!(store.read("hydration", &subject), None);
}

#[test]
fn test_subjects_are_independent() {
    let graph = clinic_graph();
    let alice = patient(1);
    let bob = patient(2);

    let mut store = intake_store(&alice)
        .with_value("weight", &bob, 90.0)
        .with_value("height", &bob, 1.8);

    let for_alice = recalculate("weight", &graph, &mut store, &alice);
    let for_bob = recalculate("weight", &graph, &mut store, &bob);

    assert_eq!(for_alice.updated["bmi"], 22.86);
    assert_eq!(for_bob.updated["bmi"], 27.78);
    assert_eq!(store.read("bmi", &alice), Some(22.86));
    assert_eq!(store.read("bmi", &bob), Some(27.78));
    // Bob has no target or intake values; those branches fail for him only
    assert!(for_alice.is_complete());
    assert_eq!(
        for_bob.failed["bmi_delta"],
        EvalError::missing_variable("target_bmi")
    );
}

#[test]
fn test_broken_branch_does_not_block_siblings() {
    let graph = clinic_graph();
    let subject = patient(1);
    // No water_intake recorded yet
    let mut store = MemoryStore::new()
        .with_value("weight", &subject, 70.0)
        .with_value("height", &subject, 1.75)
        .with_value("target_bmi", &subject, 21.0);

    let result = recalculate("weight", &graph, &mut store, &subject);

    assert_eq!(result.updated["bmi"], 22.86);
    assert_eq!(result.updated["bmi_delta"], 1.86);
    assert_eq!(
        result.failed["hydration"],
        EvalError::missing_variable("water_intake")
    );
}

#[test]
fn test_authoring_pipeline_then_recalculation() {
    // The admin saves formulas one at a time; each save validates against
    // the scope as it exists.
    let mut saved = Vec::new();

    let outcome = validate_formula("bmi", "{weight} / ({height} * {height})", &saved);
    assert!(outcome.valid);
    assert_eq!(outcome.dependencies, ["weight", "height"]);
    saved.push(def("bmi", "{weight} / ({height} * {height})", 2));

    let outcome = validate_formula("bmi_delta", "{bmi} - {target_bmi}", &saved);
    assert!(outcome.valid);
    saved.push(def("bmi_delta", "{bmi} - {target_bmi}", 2));

    // A save that would close a cycle is rejected and never persisted
    let outcome = validate_formula("target_bmi", "{bmi_delta} * 1", &saved);
    assert!(!outcome.valid);

    let graph = DependencyGraph::build(saved).unwrap();
    let subject = patient(7);
    let mut store = intake_store(&subject);
    let result = recalculate("weight", &graph, &mut store, &subject);
    assert!(result.is_complete());
    assert_eq!(result.updated.len(), 2);
}

#[test]
fn test_recalc_result_serializes_for_the_api_layer() {
    let graph = DependencyGraph::build([def("ratio", "{a} / {b}", 2)]).unwrap();
    let subject = patient(1);
    let mut store = MemoryStore::new()
        .with_value("a", &subject, 1.0)
        .with_value("b", &subject, 0.0);

    let result = recalculate("a", &graph, &mut store, &subject);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["failed"]["ratio"]["kind"], "divisionByZero");
    assert_eq!(json["updated"], serde_json::json!({}));
}
