//! Dependency graph over calculated fields
//!
//! Edge `A -> B` means A's value is required to compute B. The graph holds
//! one node per formula definition plus one source node per plain variable
//! referenced anywhere; source values come straight from the store and are
//! never computed. The graph must be acyclic; the topological evaluation
//! order is computed once per build and cached until the next rebuild.

use crate::FormulaDefinition;
use indexmap::{IndexMap, IndexSet};
use nutrivault_formula_diagnostics::{FML0102, FML0105, FormulaError, Result};

/// DFS mark for cycle detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// A dependency graph for one evaluation scope
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Calculated-field definitions, keyed by name
    definitions: IndexMap<String, FormulaDefinition>,
    /// Forward edges: variable name -> formulas that consume it
    dependents: IndexMap<String, Vec<String>>,
    /// Referenced variables with no definition; read directly from the store
    sources: IndexSet<String>,
    /// Every node in dependency order: a variable always appears after all
    /// variables it depends on
    topo_order: Vec<String>,
}

impl DependencyGraph {
    /// Build a graph from all definitions in one scope
    ///
    /// Rejects duplicate names and dependency cycles; a cycle error carries
    /// the ordered list of names forming the cycle for diagnostic display.
    /// Any definition mutation (add, remove, expression edit) triggers a
    /// full rebuild; incremental patching is deliberately not attempted.
    pub fn build(definitions: impl IntoIterator<Item = FormulaDefinition>) -> Result<Self> {
        let mut defs: IndexMap<String, FormulaDefinition> = IndexMap::new();
        for def in definitions {
            if defs.contains_key(&def.name) {
                return Err(FormulaError::validation(
                    FML0105,
                    format!("duplicate definition name '{}'", def.name),
                ));
            }
            defs.insert(def.name.clone(), def);
        }

        let mut dependents: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut sources: IndexSet<String> = IndexSet::new();

        for name in defs.keys() {
            dependents.entry(name.clone()).or_default();
        }
        for def in defs.values() {
            for dep in def.dependencies() {
                dependents
                    .entry(dep.clone())
                    .or_default()
                    .push(def.name.clone());
                if !defs.contains_key(dep) {
                    sources.insert(dep.clone());
                }
            }
        }

        let topo_order = toposort(&dependents)?;

        log::debug!(
            "dependency graph built: {} formulas, {} sources, {} edges",
            defs.len(),
            sources.len(),
            dependents.values().map(Vec::len).sum::<usize>(),
        );

        Ok(Self {
            definitions: defs,
            dependents,
            sources,
            topo_order,
        })
    }

    /// Rebuild with one definition added or replaced
    pub fn rebuilt_with(&self, definition: FormulaDefinition) -> Result<Self> {
        let mut defs: Vec<FormulaDefinition> = self
            .definitions
            .values()
            .filter(|d| d.name != definition.name)
            .cloned()
            .collect();
        defs.push(definition);
        Self::build(defs)
    }

    /// Rebuild with one definition removed
    pub fn rebuilt_without(&self, name: &str) -> Result<Self> {
        Self::build(
            self.definitions
                .values()
                .filter(|d| d.name != name)
                .cloned(),
        )
    }

    /// Look up a definition by name
    pub fn definition(&self, name: &str) -> Option<&FormulaDefinition> {
        self.definitions.get(name)
    }

    /// Iterate all definitions in insertion order
    pub fn definitions(&self) -> impl Iterator<Item = &FormulaDefinition> {
        self.definitions.values()
    }

    /// Number of calculated fields in the graph
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the graph holds no definitions
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Whether `name` is a plain (non-calculated) variable
    pub fn is_source(&self, name: &str) -> bool {
        self.sources.contains(name)
    }

    /// The cached topological order over every node in the graph
    pub fn topological_order(&self) -> &[String] {
        &self.topo_order
    }

    /// Formulas that read `name` directly
    pub fn direct_dependents(&self, name: &str) -> &[String] {
        self.dependents.get(name).map_or(&[], Vec::as_slice)
    }

    /// Every formula transitively affected by a change to `name`
    ///
    /// Follows forward edges only; the changed variable itself is not part
    /// of the result.
    pub fn transitive_dependents(&self, name: &str) -> IndexSet<String> {
        let mut affected = IndexSet::new();
        let mut queue: Vec<&str> = vec![name];

        while let Some(current) = queue.pop() {
            for dependent in self.direct_dependents(current) {
                if affected.insert(dependent.clone()) {
                    queue.push(dependent);
                }
            }
        }

        affected
    }
}

/// Topological sort with three-color cycle detection
///
/// Depth-first over forward edges; reversing the post-order yields an order
/// where every variable appears after everything it depends on. A back-edge
/// to a gray node is a cycle, reported with the path sliced from the DFS
/// stack.
fn toposort(dependents: &IndexMap<String, Vec<String>>) -> Result<Vec<String>> {
    let mut color: IndexMap<&str, Color> = dependents
        .keys()
        .map(|name| (name.as_str(), Color::White))
        .collect();
    let mut post_order: Vec<String> = Vec::with_capacity(dependents.len());

    struct Frame<'a> {
        node: &'a str,
        next_child: usize,
    }

    for start in dependents.keys() {
        let start = start.as_str();
        if color[start] != Color::White {
            continue;
        }

        let mut stack: Vec<Frame<'_>> = vec![Frame {
            node: start,
            next_child: 0,
        }];
        color.insert(start, Color::Gray);

        while let Some(frame) = stack.last_mut() {
            let children = &dependents[frame.node];
            if frame.next_child >= children.len() {
                color.insert(frame.node, Color::Black);
                post_order.push(frame.node.to_string());
                stack.pop();
                continue;
            }

            let child = children[frame.next_child].as_str();
            frame.next_child += 1;

            match color[child] {
                Color::White => {
                    color.insert(child, Color::Gray);
                    stack.push(Frame {
                        node: child,
                        next_child: 0,
                    });
                }
                Color::Gray => {
                    // Back-edge: the cycle is the stack slice from the gray
                    // node to the current one.
                    let from = stack
                        .iter()
                        .position(|f| f.node == child)
                        .unwrap_or(0);
                    let path: Vec<String> =
                        stack[from..].iter().map(|f| f.node.to_string()).collect();
                    return Err(FormulaError::cycle(
                        FML0102,
                        format!("dependency cycle: {}", path.join(" -> ")),
                        path,
                    ));
                }
                Color::Black => {}
            }
        }
    }

    post_order.reverse();
    Ok(post_order)
}
