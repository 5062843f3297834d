//! The value store boundary
//!
//! The surrounding system persists custom-field and measure values in its
//! own tables; the engine only ever sees numbers through this interface.
//! The store adapter is responsible for coercing the host's loosely-typed
//! columns and must reject non-numeric values before they reach the engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifies one subject (one patient, one visit)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    /// Wrap a subject identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Read/write access to stored variable values, scoped by subject
///
/// Implementations may block (a database transaction is typical). The
/// engine reads source values and writes recomputed results through this
/// trait and performs no other I/O. Callers must serialize concurrent
/// passes for the same subject; passes for different subjects are
/// independent.
pub trait ValueStore {
    /// Read the current value of `name` for `subject`, if present
    fn read(&self, name: &str, subject: &SubjectId) -> Option<f64>;

    /// Persist a recomputed value of `name` for `subject`
    fn write(&mut self, name: &str, subject: &SubjectId, value: f64);
}

/// In-memory store, used by tests and the command-line tool
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<(String, String), f64>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, builder-style
    pub fn with_value(mut self, name: impl Into<String>, subject: &SubjectId, value: f64) -> Self {
        self.values
            .insert((name.into(), subject.as_str().to_string()), value);
        self
    }

    /// Number of stored values across all subjects
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueStore for MemoryStore {
    fn read(&self, name: &str, subject: &SubjectId) -> Option<f64> {
        self.values
            .get(&(name.to_string(), subject.as_str().to_string()))
            .copied()
    }

    fn write(&mut self, name: &str, subject: &SubjectId, value: f64) {
        self.values
            .insert((name.to_string(), subject.as_str().to_string()), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_scopes_by_subject() {
        let alice = SubjectId::from("patient-1");
        let bob = SubjectId::from("patient-2");
        let mut store = MemoryStore::new().with_value("weight", &alice, 70.0);

        assert_eq!(store.read("weight", &alice), Some(70.0));
        assert_eq!(store.read("weight", &bob), None);

        store.write("weight", &bob, 82.5);
        assert_eq!(store.read("weight", &bob), Some(82.5));
        assert_eq!(store.read("weight", &alice), Some(70.0));
    }
}
