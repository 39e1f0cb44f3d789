// src/dag/graph.rs

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::dag::node::{Node, NodeKind, NodeMap, NodeTask};
use crate::engine::FileName;
use crate::rules::RuleSet;

/// Construction-time node: dependency count and dependents only.
#[derive(Debug, Clone, Default)]
struct GraphNode {
    /// Length of the dependency list of the last rule naming this file.
    dependency_count: usize,
    /// Files that list this one as a dependency, in declaration order.
    dependents: Vec<FileName>,
}

/// Dependency graph keyed by filename.
///
/// Built single-threaded from a [`RuleSet`], then [`frozen`](Self::freeze)
/// into shared nodes plus one [`NodeTask`] per file for the workers. The
/// builder does not look for cycles; `rules::validate` rejects them earlier.
#[derive(Debug, Clone, Default)]
pub struct DepGraph {
    nodes: HashMap<FileName, GraphNode>,
    /// Files with no declared dependencies, in order of first reference.
    leaves: Vec<FileName>,
    /// Files with at least one rule, in order of first declaration.
    targets: Vec<FileName>,
}

impl DepGraph {
    pub fn build(rules: &RuleSet) -> Self {
        let mut graph = Self::default();

        for rule in rules {
            for dep in rule.deps.iter() {
                if !graph.nodes.contains_key(dep) {
                    graph.nodes.insert(dep.clone(), GraphNode::default());
                    graph.leaves.push(dep.clone());
                }
                if let Some(node) = graph.nodes.get_mut(dep) {
                    node.dependents.push(rule.target.clone());
                }
            }

            // A target is never a leaf, even if an earlier rule referenced it
            // as a dependency.
            graph.leaves.retain(|leaf| *leaf != rule.target);

            let node = graph.nodes.entry(rule.target.clone()).or_default();
            node.dependency_count = rule.deps.len();

            if !graph.targets.contains(&rule.target) {
                graph.targets.push(rule.target.clone());
            }
        }

        // A file is a leaf iff its final dependency count is zero, which
        // includes targets whose last rule is `name <- ;`.
        let (empty, targets): (Vec<FileName>, Vec<FileName>) = std::mem::take(&mut graph.targets)
            .into_iter()
            .partition(|t| graph.nodes.get(t).is_some_and(|n| n.dependency_count == 0));
        graph.leaves.extend(empty);
        graph.targets = targets;

        debug!(
            nodes = graph.nodes.len(),
            leaves = graph.leaves.len(),
            targets = graph.targets.len(),
            "dependency graph built"
        );
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.nodes.contains_key(filename)
    }

    /// All filenames in the graph (unordered).
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn leaves(&self) -> &[FileName] {
        &self.leaves
    }

    pub fn targets(&self) -> &[FileName] {
        &self.targets
    }

    /// Number of workers a run of this graph needs.
    pub fn worker_count(&self) -> usize {
        self.leaves.len() + self.targets.len()
    }

    pub fn dependency_count(&self, filename: &str) -> Option<usize> {
        self.nodes.get(filename).map(|n| n.dependency_count)
    }

    pub fn dependents_of(&self, filename: &str) -> &[FileName] {
        self.nodes
            .get(filename)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Leaf/target classification of `filename`.
    pub fn kind_of(&self, filename: &str) -> Option<NodeKind> {
        if self.leaves.iter().any(|l| l == filename) {
            Some(NodeKind::Leaf)
        } else if self.targets.iter().any(|t| t == filename) {
            Some(NodeKind::Target)
        } else {
            None
        }
    }

    /// Freeze the graph for a run.
    ///
    /// Returns the shared node map and one task per worker: targets first
    /// (in declaration order), then leaves.
    pub fn freeze(mut self) -> (Arc<NodeMap>, Vec<NodeTask>) {
        let mut map = NodeMap::with_capacity(self.nodes.len());
        let mut tasks = Vec::with_capacity(self.worker_count());

        let order = self
            .targets
            .iter()
            .map(|name| (name, NodeKind::Target))
            .chain(self.leaves.iter().map(|name| (name, NodeKind::Leaf)));

        for (name, kind) in order {
            let Some(info) = self.nodes.remove(name) else {
                continue;
            };
            let (node, mailbox) = Node::new(name.clone(), info.dependency_count, info.dependents);
            tasks.push(NodeTask {
                filename: name.clone(),
                kind,
                dependency_count: info.dependency_count,
                mailbox,
            });
            map.insert(name.clone(), node);
        }

        (Arc::new(map), tasks)
    }
}
