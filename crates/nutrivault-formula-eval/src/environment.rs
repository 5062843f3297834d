//! Evaluation environment: variable bindings for one subject

use std::collections::HashMap;

/// Variable bindings available to one evaluation pass for one subject
///
/// Built fresh from the store for each recalculation pass; never persisted
/// by the engine. A name that is absent stays absent; there is no default
/// substitution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    values: HashMap<String, f64>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with_value(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Bind a variable
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Look up a variable
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Whether a variable is bound
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no variables are bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, f64)> for Environment {
    fn from_iter<I: IntoIterator<Item = (N, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let env = Environment::new()
            .with_value("weight", 70.0)
            .with_value("height", 1.75);

        assert_eq!(env.get("weight"), Some(70.0));
        assert_eq!(env.get("missing"), None);
        assert!(env.contains("height"));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_from_iterator() {
        let env: Environment = [("a", 1.0), ("b", 2.0)].into_iter().collect();
        assert_eq!(env.get("b"), Some(2.0));
    }
}
