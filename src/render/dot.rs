// src/render/dot.rs

use std::collections::HashMap;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};

use crate::errors::Result;
use crate::graph::{Graph, NodeId};
use crate::render::GraphRenderer;

type DotGraph = DiGraph<NodeId, &'static str>;

/// Graphviz `digraph` output. Schedulers are ellipses, builders are boxes;
/// both are labelled with their bare name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl GraphRenderer for DotRenderer {
    fn extension(&self) -> &'static str {
        "dot"
    }

    fn render(&self, _name: &str, graph: &Graph) -> Result<String> {
        let g = to_petgraph(graph);

        let edge_attrs = |_: &DotGraph, _: EdgeReference<'_, &'static str>| String::new();
        let node_attrs = |_: &DotGraph, (_, node): (NodeIndex, &NodeId)| {
            let shape = if node.is_scheduler() { "ellipse" } else { "box" };
            format!("label = \"{}\" shape = {} ", escape(node.label()), shape)
        };

        let config = [Config::NodeNoLabel, Config::EdgeNoLabel];
        let dot = Dot::with_attr_getters(
            &g,
            &config,
            &edge_attrs,
            &node_attrs,
        );
        Ok(format!("{dot}"))
    }
}

fn to_petgraph(graph: &Graph) -> DotGraph {
    let mut g = DotGraph::with_capacity(graph.nodes.len(), graph.edges.len());
    let mut index: HashMap<&NodeId, NodeIndex> = HashMap::with_capacity(graph.nodes.len());

    for node in &graph.nodes {
        index.insert(node, g.add_node(node.clone()));
    }
    for edge in &graph.edges {
        let (Some(&from), Some(&to)) = (index.get(&edge.source), index.get(&edge.target)) else {
            continue;
        };
        g.add_edge(from, to, "");
    }

    g
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
