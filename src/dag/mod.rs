// src/dag/mod.rs

//! Task dependency graph and build ordering.
//!
//! - [`node`] holds the `recipe.task` node identifiers.
//! - [`graph`] parses the dot graph written by `bitbake -g` into a
//!   dependency relation.
//! - [`linearize`] walks that relation depth-first, producing a
//!   dependency-first order.

pub mod graph;
pub mod linearize;
pub mod node;

pub use graph::DependencyGraph;
pub use linearize::Linearizer;
pub use node::{NodeId, TaskNode};
