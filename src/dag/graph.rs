// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use regex::Regex;
use tracing::debug;

use crate::dag::linearize::Linearizer;
use crate::dag::node::NodeId;
use crate::errors::{RebakeError, Result};
use crate::fs::FileSystem;

static NO_DEPENDENCIES: BTreeSet<NodeId> = BTreeSet::new();

/// Dependency relation between task nodes.
///
/// Edges point from a node to the nodes it depends on. Dependency sets are
/// ordered so that walks over the graph are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

/// Line matchers for the dot files written by `bitbake -g`:
///
/// ```text
/// "busybox.do_build" [label="busybox do_build\n:1.36.1-r0\n..."]
/// "busybox.do_build" -> "busybox.do_populate_sysroot"
/// "busybox.do_build" -> "virtual/libc.do_build" [style=dashed]
/// ```
struct DotLineMatcher {
    declaration: Regex,
    edge: Regex,
}

impl DotLineMatcher {
    fn new() -> Result<Self> {
        let declaration = Regex::new(r#"^"(?P<name>[^"]+)" \[label="(?P<label>[^"]+)"\]"#)
            .context("compiling node declaration pattern")?;
        let edge = Regex::new(r#"^"(?P<src>[^"]+)" -> "(?P<dest>[^"]+)"( \[style=dashed\])?"#)
            .context("compiling edge pattern")?;
        Ok(Self { declaration, edge })
    }

    /// The `(src, dest)` pair of an edge line; `None` for anything else.
    fn edge<'l>(&self, line: &'l str) -> Option<(&'l str, &'l str)> {
        if self.declaration.is_match(line) {
            return None;
        }
        let caps = self.edge.captures(line)?;
        let src = caps.name("src")?.as_str();
        let dest = caps.name("dest")?.as_str();
        Some((src, dest))
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `src` depends on `dest`.
    pub fn add_edge(&mut self, src: impl Into<NodeId>, dest: impl Into<NodeId>) {
        self.edges.entry(src.into()).or_default().insert(dest.into());
    }

    /// Parse dot text into a dependency relation.
    ///
    /// Node declarations and every line that is not an edge (headers,
    /// braces, attributes, comments) are skipped. Dashed and solid edges
    /// are treated alike. Matches are anchored at column zero, so indented
    /// lines never count.
    pub fn parse(text: &str) -> Result<Self> {
        let matcher = DotLineMatcher::new()?;
        let mut graph = Self::new();

        for line in text.lines() {
            if let Some((src, dest)) = matcher.edge(line) {
                graph.add_edge(src, dest);
            }
        }

        debug!(
            nodes = graph.edges.len(),
            edges = graph.edge_count(),
            "parsed dependency graph"
        );
        Ok(graph)
    }

    /// Read and parse a graph file.
    pub fn from_file(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let text = fs
            .read_to_string(path)
            .map_err(|source| RebakeError::GraphFile {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&text)
    }

    /// Direct dependencies of `node`; empty if `node` never appears as an
    /// edge source.
    pub fn dependencies_of(&self, node: &str) -> &BTreeSet<NodeId> {
        self.edges.get(node).unwrap_or(&NO_DEPENDENCIES)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Everything `start` depends on, transitively, dependencies first.
    /// `start` itself is not part of the output.
    pub fn linearize<'a>(&'a self, start: &'a str) -> Linearizer<'a> {
        Linearizer::new(self, start)
    }

    /// Fail with [`RebakeError::DagCycle`] if the relation has a cycle.
    pub fn ensure_acyclic(&self) -> Result<()> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for (src, deps) in self.edges.iter() {
            graph.add_node(src.as_str());
            for dest in deps {
                graph.add_edge(src.as_str(), dest.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => Err(RebakeError::DagCycle(format!(
                "dependency cycle involving task '{}'",
                cycle.node_id()
            ))),
        }
    }
}
