//! Recalculation engine
//!
//! One pass propagates a single changed input through every calculated
//! field that transitively depends on it, in topological order, writing
//! each success back to the store before anything downstream reads it.

use crate::environment::Environment;
use crate::error::EvalError;
use crate::evaluator::evaluate_rounded;
use crate::store::{SubjectId, ValueStore};
use indexmap::IndexMap;
use nutrivault_formula_graph::DependencyGraph;
use serde::Serialize;

/// Outcome of one recalculation pass
///
/// `updated` holds every value written this pass, in write order. `failed`
/// holds per-formula evaluation errors; those formulas' stored values are
/// left untouched, and the caller decides how to surface them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalcResult {
    /// Recomputed values, keyed by formula name, in evaluation order
    pub updated: IndexMap<String, f64>,
    /// Formulas that could not be recomputed this pass
    pub failed: IndexMap<String, EvalError>,
}

impl RecalcResult {
    /// Whether every affected formula recomputed successfully
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Recalculate everything downstream of one changed variable
///
/// The affected set is the transitive forward dependents of `changed`,
/// not all calculated fields, processed in the graph's cached topological
/// order so each formula's inputs are settled before it runs. Per formula,
/// the environment is built from `store.read` for source variables and
/// from values recomputed earlier in this same pass for calculated ones;
/// a stale upstream value is never used. A formula whose upstream failed
/// this pass fails with the upstream's name as a missing variable instead
/// of reading the stale stored value.
///
/// Failures are isolated: one broken formula never blocks independent
/// branches, and the only side effects are the `store.write` calls for
/// successful values, in strict topological order.
pub fn recalculate(
    changed: &str,
    graph: &DependencyGraph,
    store: &mut dyn ValueStore,
    subject: &SubjectId,
) -> RecalcResult {
    let affected = graph.transitive_dependents(changed);
    let mut result = RecalcResult::default();

    log::debug!(
        "recalculating {} formulas downstream of '{changed}' for subject {subject}",
        affected.len(),
    );

    for name in graph.topological_order() {
        if !affected.contains(name) {
            continue;
        }
        let Some(def) = graph.definition(name) else {
            continue;
        };

        let mut env = Environment::new();
        let mut upstream_failure: Option<EvalError> = None;

        for dep in def.dependencies() {
            if let Some(value) = result.updated.get(dep) {
                env.set(dep.clone(), *value);
            } else if result.failed.contains_key(dep) {
                upstream_failure = Some(EvalError::missing_variable(dep.as_str()));
                break;
            } else if let Some(value) = store.read(dep, subject) {
                env.set(dep.clone(), value);
            }
            // Absent values stay absent; the evaluator reports them.
        }

        let outcome = match upstream_failure {
            Some(err) => Err(err),
            None => evaluate_rounded(&def.expression_tree().inner, &env, def.decimal_places),
        };

        match outcome {
            Ok(value) => {
                store.write(name, subject, value);
                result.updated.insert(name.clone(), value);
            }
            Err(err) => {
                log::debug!("recalculation of '{name}' failed: {err}");
                result.failed.insert(name.clone(), err);
            }
        }
    }

    result
}
