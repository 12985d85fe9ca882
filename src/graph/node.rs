// src/graph/node.rs

//! Shared graph primitives: node identifiers, directed edges and the
//! per-scheduler [`Graph`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

/// Identity of a node in a scheduler graph.
///
/// Schedulers and builders live in separate namespaces: a scheduler named
/// `"docs"` and a builder named `"docs"` are two different nodes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum NodeId {
    Scheduler(String),
    Builder(String),
}

impl NodeId {
    pub fn scheduler(name: impl Into<String>) -> Self {
        NodeId::Scheduler(name.into())
    }

    pub fn builder(name: impl Into<String>) -> Self {
        NodeId::Builder(name.into())
    }

    /// Display label: the bare scheduler or builder name.
    pub fn label(&self) -> &str {
        match self {
            NodeId::Scheduler(name) | NodeId::Builder(name) => name,
        }
    }

    pub fn is_scheduler(&self) -> bool {
        matches!(self, NodeId::Scheduler(_))
    }

    /// Same kind of node, different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        match self {
            NodeId::Scheduler(_) => NodeId::Scheduler(name.into()),
            NodeId::Builder(_) => NodeId::Builder(name.into()),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Scheduler(name) => write!(f, "scheduler:{name}"),
            NodeId::Builder(name) => write!(f, "builder:{name}"),
        }
    }
}

/// Directed edge `source -> target`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    /// Rewrite both endpoints through `f`.
    pub fn map_endpoints(&self, mut f: impl FnMut(&NodeId) -> NodeId) -> Edge {
        Edge::new(f(&self.source), f(&self.target))
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Node and edge sets for one scheduler (or, after merging, one root
/// scheduler together with everything folded into it).
///
/// Every edge endpoint is also in `nodes`; [`Graph::add_edge`] keeps that
/// true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    pub nodes: BTreeSet<NodeId>,
    pub edges: BTreeSet<Edge>,
    /// `false` when some trigger, dependency or aggregation feeds this
    /// scheduler from upstream.
    pub is_root: bool,
}

impl Graph {
    pub fn new(is_root: bool) -> Self {
        Self {
            nodes: BTreeSet::new(),
            edges: BTreeSet::new(),
            is_root,
        }
    }

    pub fn add_node(&mut self, node: NodeId) {
        self.nodes.insert(node);
    }

    /// Insert `source -> target`, adding both endpoints as nodes.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) {
        self.nodes.insert(source.clone());
        self.nodes.insert(target.clone());
        self.edges.insert(Edge::new(source, target));
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.nodes.contains(node)
    }

    /// Union `other`'s nodes and edges into `self`. `is_root` is unchanged.
    pub fn absorb(&mut self, other: &Graph) {
        self.nodes.extend(other.nodes.iter().cloned());
        self.edges.extend(other.edges.iter().cloned());
    }

    /// Source endpoints of every edge: the nodes this graph hangs off.
    pub fn anchors(&self) -> impl Iterator<Item = &NodeId> {
        self.edges.iter().map(|e| &e.source)
    }

    /// All edges with `node` as source or target.
    pub fn incident_edges(&self, node: &NodeId) -> BTreeSet<Edge> {
        self.edges.iter().filter(|e| e.touches(node)).cloned().collect()
    }
}

/// Graphs keyed by scheduler name.
pub type GraphSet = BTreeMap<String, Graph>;
