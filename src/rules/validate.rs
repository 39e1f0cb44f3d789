// src/rules/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::errors::{MakeError, Result};
use crate::rules::model::{RawRuleSet, RuleSet};

impl TryFrom<RawRuleSet> for RuleSet {
    type Error = MakeError;

    fn try_from(raw: RawRuleSet) -> std::result::Result<Self, Self::Error> {
        validate_raw_rules(&raw)?;
        Ok(RuleSet::new_unchecked(raw.rules))
    }
}

fn validate_raw_rules(raw: &RawRuleSet) -> Result<()> {
    ensure_has_rules(raw)?;
    validate_self_dependencies(raw)?;
    warn_duplicate_targets(raw);
    validate_acyclic(raw)?;
    Ok(())
}

fn ensure_has_rules(raw: &RawRuleSet) -> Result<()> {
    if raw.rules.is_empty() {
        return Err(MakeError::EmptyRuleSet);
    }
    Ok(())
}

fn validate_self_dependencies(raw: &RawRuleSet) -> Result<()> {
    for rule in raw.rules.iter() {
        if rule.deps.iter().any(|dep| *dep == rule.target) {
            return Err(MakeError::SelfDependency(rule.target.clone()));
        }
    }
    Ok(())
}

/// A repeated target keeps only the dependency count of its last rule.
fn warn_duplicate_targets(raw: &RawRuleSet) {
    let mut seen: HashSet<&str> = HashSet::new();
    for rule in raw.rules.iter() {
        if !seen.insert(rule.target.as_str()) {
            warn!(
                target_file = %rule.target,
                "target declared more than once; the last rule replaces earlier dependency lists"
            );
        }
    }
}

fn validate_acyclic(raw: &RawRuleSet) -> Result<()> {
    // Edge direction: dep -> target, for every rule (including overwritten
    // duplicates, since the graph builder keeps their dependents).
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for rule in raw.rules.iter() {
        graph.add_node(rule.target.as_str());
        for dep in rule.deps.iter() {
            graph.add_edge(dep.as_str(), rule.target.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(MakeError::DependencyCycle(format!(
            "cycle detected involving '{}'",
            cycle.node_id()
        ))),
    }
}
