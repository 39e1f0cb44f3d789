// src/dag/mod.rs

//! Dependency graph of files.
//!
//! - [`graph`] builds the graph from a rule set (single-threaded) and
//!   classifies every file as a leaf or a target.
//! - [`node`] holds the frozen per-file nodes shared by the workers, with
//!   their completion inbox and cancellation slot.

pub mod graph;
pub mod node;

pub use graph::DepGraph;
pub use node::{Mailbox, Node, NodeKind, NodeMap, NodeTask};
