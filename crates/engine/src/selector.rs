// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Selector Engine (C6): a small dbt-style grammar for choosing which
//! pipelines run.
//!
//! ```text
//! selector := atom (',' atom)*
//! atom      := lead? body trail?
//! lead      := '+'
//! trail     := '+'
//! body      := name | 'tag:' tagname
//! ```
//!
//! `+x` adds `x`'s upstream closure, `x+` adds its downstream closure,
//! `+x+` adds both. `tag:t` expands to every pipeline carrying tag `t`
//! before lead/trail expansion is applied. `--exclude` is evaluated the
//! same way and subtracted from the selected set. With no `--select` at
//! all, every pipeline is selected.

use crate::dag::Graph;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("malformed selector expression: '{0}'")]
    Malformed(String),
    #[error("selector references unknown pipeline '{0}'")]
    UnknownName(String),
    #[error("selector references unknown tag 'tag:{0}'")]
    UnknownTag(String),
    #[error("cannot apply selector: {0}")]
    Cycle(String),
}

pub struct SelectorContext<'a> {
    graph: &'a Graph,
    tags: &'a HashMap<String, Vec<String>>,
}

impl<'a> SelectorContext<'a> {
    pub fn new(graph: &'a Graph, tags: &'a HashMap<String, Vec<String>>) -> Self {
        Self { graph, tags }
    }

    fn names_with_tag(&self, tag: &str) -> Vec<String> {
        self.tags
            .iter()
            .filter(|(_, tags)| tags.iter().any(|t| t == tag))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Resolve one comma-separated selector expression to a set of pipeline
/// names.
pub fn resolve(expr: &str, ctx: &SelectorContext) -> Result<BTreeSet<String>, SelectorError> {
    let mut result = BTreeSet::new();
    for atom in expr.split(',') {
        let atom = atom.trim();
        if atom.is_empty() {
            return Err(SelectorError::Malformed(expr.to_string()));
        }
        result.extend(resolve_atom(atom, ctx)?);
    }
    Ok(result)
}

fn resolve_atom(atom: &str, ctx: &SelectorContext) -> Result<BTreeSet<String>, SelectorError> {
    let lead = atom.starts_with('+');
    let rest = if lead { &atom[1..] } else { atom };
    let trail = rest.ends_with('+');
    let body = if trail { &rest[..rest.len() - 1] } else { rest };

    if body.is_empty() || body.contains('+') {
        return Err(SelectorError::Malformed(atom.to_string()));
    }

    let base_names: Vec<String> = if let Some(tag) = body.strip_prefix("tag:") {
        if tag.is_empty() {
            return Err(SelectorError::Malformed(atom.to_string()));
        }
        let names = ctx.names_with_tag(tag);
        if names.is_empty() {
            return Err(SelectorError::UnknownTag(tag.to_string()));
        }
        names
    } else {
        if !ctx.graph.contains(body) {
            return Err(SelectorError::UnknownName(body.to_string()));
        }
        vec![body.to_string()]
    };

    let mut set = BTreeSet::new();
    for name in &base_names {
        set.insert(name.clone());
        if lead {
            set.extend(ctx.graph.ancestors(name));
        }
        if trail {
            set.extend(ctx.graph.descendants(name));
        }
    }
    Ok(set)
}

/// Apply `--select`/`--exclude` and return the result in the graph's
/// topological order (not input order). An empty `select` list means
/// "every pipeline".
pub fn apply(
    select: &[String],
    exclude: &[String],
    ctx: &SelectorContext,
) -> Result<Vec<String>, SelectorError> {
    let selected = if select.is_empty() {
        ctx.graph.nodes().iter().cloned().collect()
    } else {
        let mut set = BTreeSet::new();
        for expr in select {
            set.extend(resolve(expr, ctx)?);
        }
        set
    };

    let mut excluded = BTreeSet::new();
    for expr in exclude {
        excluded.extend(resolve(expr, ctx)?);
    }

    let remaining: BTreeSet<String> = selected.difference(&excluded).cloned().collect();
    let order = ctx
        .graph
        .topological_order()
        .map_err(|e| SelectorError::Cycle(e.to_string()))?;
    Ok(order.into_iter().filter(|n| remaining.contains(n)).collect())
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
