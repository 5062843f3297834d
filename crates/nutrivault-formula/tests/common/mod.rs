//! Shared helpers for integration tests

use nutrivault_formula::{FormulaDefinition, MemoryStore, SubjectId};

/// Build a definition, panicking on validation failure
pub fn def(name: &str, expression: &str, decimal_places: u32) -> FormulaDefinition {
    FormulaDefinition::new(format!("id-{name}"), name, expression, decimal_places)
        .unwrap_or_else(|e| panic!("invalid definition '{name}': {e}"))
}

/// A patient subject used across tests
pub fn patient(n: u32) -> SubjectId {
    SubjectId::new(format!("patient-{n}"))
}

/// Store seeded with one patient's intake measurements
pub fn intake_store(subject: &SubjectId) -> MemoryStore {
    MemoryStore::new()
        .with_value("weight", subject, 70.0)
        .with_value("height", subject, 1.75)
        .with_value("target_bmi", subject, 21.0)
        .with_value("water_intake", subject, 2.1)
}
