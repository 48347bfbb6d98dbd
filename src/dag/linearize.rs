// src/dag/linearize.rs

//! Depth-first, dependency-first walk over a [`DependencyGraph`].

use std::collections::HashSet;
use std::collections::btree_set;

use crate::dag::graph::DependencyGraph;
use crate::dag::node::{NodeId, TaskNode};

/// One level of the walk: a node and the dependencies still to descend into.
#[derive(Debug)]
struct Frame<'a> {
    node: &'a str,
    deps: btree_set::Iter<'a, NodeId>,
}

/// Lazy post-order traversal yielding every node reachable from a start
/// node exactly once, each after all of its own dependencies.
///
/// The walk uses an explicit stack, so deep graphs do not grow the call
/// stack. A node is marked visited when first reached, before its
/// dependencies are explored. The start node is never yielded.
///
/// The iterator is finite and cannot be restarted; build a new one with
/// [`DependencyGraph::linearize`] to walk again.
#[derive(Debug)]
pub struct Linearizer<'a> {
    graph: &'a DependencyGraph,
    visited: HashSet<&'a str>,
    stack: Vec<Frame<'a>>,
}

impl<'a> Linearizer<'a> {
    pub fn new(graph: &'a DependencyGraph, start: &'a str) -> Self {
        let mut visited = HashSet::new();
        visited.insert(start);
        Self {
            graph,
            visited,
            stack: vec![Frame {
                node: start,
                deps: graph.dependencies_of(start).iter(),
            }],
        }
    }
}

impl Iterator for Linearizer<'_> {
    type Item = TaskNode;

    fn next(&mut self) -> Option<TaskNode> {
        loop {
            let next_dep = self.stack.last_mut()?.deps.next();

            match next_dep {
                Some(dep) => {
                    let dep = dep.as_str();
                    if self.visited.insert(dep) {
                        self.stack.push(Frame {
                            node: dep,
                            deps: self.graph.dependencies_of(dep).iter(),
                        });
                    }
                }
                None => {
                    let finished = self.stack.pop()?;
                    // The bottom frame is the start node.
                    if !self.stack.is_empty() {
                        return Some(TaskNode::from_id(finished.node));
                    }
                }
            }
        }
    }
}
