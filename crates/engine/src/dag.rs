// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline DAG (C5): topological ordering and ancestor/descendant
//! traversal over a dependency graph. Used twice — once for the
//! inter-pipeline graph (nodes are pipeline names, edges come from
//! `depends_on`) and once per pipeline for its step graph (nodes are step
//! ids). Both are plain string-keyed graphs; the caller maps its typed ids
//! to strings and back.

use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cycle detected among: {}", participants.join(", "))]
pub struct CycleError {
    pub participants: Vec<String>,
}

/// A dependency graph: `depends_on[a]` lists the nodes that must be
/// emitted before `a`.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<String>,
    depends_on: HashMap<String, Vec<String>>,
}

impl Graph {
    pub fn new<F>(nodes: impl IntoIterator<Item = String>, depends_on: F) -> Self
    where
        F: Fn(&str) -> Vec<String>,
    {
        let nodes: Vec<String> = nodes.into_iter().collect();
        let depends_on = nodes
            .iter()
            .map(|n| (n.clone(), depends_on(n)))
            .collect();
        Self { nodes, depends_on }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn contains(&self, node: &str) -> bool {
        self.depends_on.contains_key(node)
    }

    pub fn cycle_check(&self) -> Result<(), CycleError> {
        self.topological_order().map(|_| ())
    }

    /// Kahn's algorithm; among nodes whose dependencies are all satisfied,
    /// always emits the lexicographically smallest next.
    pub fn topological_order(&self) -> Result<Vec<String>, CycleError> {
        let mut indegree: HashMap<&str, usize> = self
            .nodes
            .iter()
            .map(|n| (n.as_str(), 0usize))
            .collect();
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

        for node in &self.nodes {
            for dep in &self.depends_on[node] {
                *indegree.get_mut(node.as_str()).expect("node in indegree map") += 1;
                dependents.entry(dep.as_str()).or_default().push(node.as_str());
            }
        }

        let mut ready: BTreeSet<&str> = indegree
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(n, _)| *n)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(next) = ready.iter().next().copied() {
            ready.remove(next);
            order.push(next.to_string());
            if let Some(waiting) = dependents.get(next) {
                for dependent in waiting {
                    let count = indegree.get_mut(dependent).expect("dependent in indegree map");
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            let emitted: HashSet<&str> = order.iter().map(String::as_str).collect();
            let mut participants: Vec<String> = self
                .nodes
                .iter()
                .filter(|n| !emitted.contains(n.as_str()))
                .cloned()
                .collect();
            participants.sort();
            return Err(CycleError { participants });
        }

        Ok(order)
    }

    /// All transitive dependencies of `node` (not including `node` itself).
    pub fn ancestors(&self, node: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<&str> = self
            .depends_on
            .get(node)
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        while let Some(n) = stack.pop() {
            if seen.insert(n.to_string()) {
                stack.extend(self.depends_on.get(n).into_iter().flatten().map(String::as_str));
            }
        }
        seen
    }

    /// All transitive dependents of `node` (not including `node` itself).
    pub fn descendants(&self, node: &str) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            for (candidate, deps) in &self.depends_on {
                if deps.iter().any(|d| d == n) && seen.insert(candidate.clone()) {
                    stack.push(candidate.as_str());
                }
            }
        }
        seen
    }
}

#[cfg(test)]
#[path = "dag_tests.rs"]
mod tests;
