//! Inheritance validation functionality
//!
//! Validates the parent links of registered types for cycles and for
//! parents that were never registered.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};

use crate::models::TypeRegistry;
use crate::schema::SchemaError;

/// Result of inheritance validation
#[derive(Debug, Default)]
pub struct InheritanceValidationResult {
    /// Cycles found, each as a closed path of fully-qualified names
    pub cycles: Vec<Vec<String>>,
    /// Parent links pointing at unregistered types
    pub missing_parents: Vec<MissingParent>,
}

impl InheritanceValidationResult {
    pub fn is_valid(&self) -> bool {
        self.cycles.is_empty() && self.missing_parents.is_empty()
    }
}

/// A type whose parent is not in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingParent {
    pub type_name: String,
    pub parent: String,
}

/// Inheritance validator
#[derive(Debug, Default)]
pub struct InheritanceValidator;

impl InheritanceValidator {
    /// Create a new inheritance validator
    pub fn new() -> Self {
        Self
    }

    /// Build the child -> parent graph and report cycles and missing parents
    pub fn validate(&self, registry: &TypeRegistry) -> InheritanceValidationResult {
        let mut graph = Graph::<String, (), Directed>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
        let mut result = InheritanceValidationResult::default();

        for descriptor in registry.types() {
            let fqn = descriptor.qualified_name();
            node_map
                .entry(fqn.clone())
                .or_insert_with(|| graph.add_node(fqn));
        }

        for descriptor in registry.types() {
            let Some(parent) = descriptor.parent.as_deref() else {
                continue;
            };
            let fqn = descriptor.qualified_name();
            match (node_map.get(&fqn), node_map.get(parent)) {
                (Some(&child_idx), Some(&parent_idx)) => {
                    graph.add_edge(child_idx, parent_idx, ());
                }
                _ => result.missing_parents.push(MissingParent {
                    type_name: fqn,
                    parent: parent.to_string(),
                }),
            }
        }

        for component in tarjan_scc(&graph) {
            let is_cycle = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&idx| graph.contains_edge(idx, idx));
            if is_cycle {
                result.cycles.push(self.cycle_path(registry, &graph, &component));
            }
        }

        result
    }

    /// Fail with the first inheritance cycle, if any
    pub fn check_cycles(&self, registry: &TypeRegistry) -> Result<(), SchemaError> {
        match self.validate(registry).cycles.into_iter().next() {
            Some(path) => Err(SchemaError::InheritanceCycle { path }),
            None => Ok(()),
        }
    }

    /// Walk parent links from the smallest member until the walk closes
    fn cycle_path(
        &self,
        registry: &TypeRegistry,
        graph: &Graph<String, (), Directed>,
        component: &[NodeIndex],
    ) -> Vec<String> {
        let Some(start) = component.iter().map(|&idx| graph[idx].as_str()).min() else {
            return Vec::new();
        };
        let mut path = vec![start.to_string()];
        let mut current = start.to_string();
        while let Some(parent) = registry.get(&current).and_then(|d| d.parent.clone()) {
            path.push(parent.clone());
            if parent == start || path.len() > component.len() {
                break;
            }
            current = parent;
        }
        path
    }
}
