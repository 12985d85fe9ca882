// src/render/json.rs

use serde::Serialize;

use crate::errors::Result;
use crate::graph::{Graph, NodeId};
use crate::render::GraphRenderer;

/// Plain JSON listing of one root graph:
///
/// ```json
/// {
///   "name": "base",
///   "nodes": [{"kind": "scheduler", "name": "base"}, ...],
///   "edges": [[{"kind": "scheduler", "name": "base"}, {"kind": "builder", "name": "compile"}], ...]
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonGraph<'a> {
    name: &'a str,
    nodes: Vec<&'a NodeId>,
    edges: Vec<[&'a NodeId; 2]>,
}

impl GraphRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, name: &str, graph: &Graph) -> Result<String> {
        let doc = JsonGraph {
            name,
            nodes: graph.nodes.iter().collect(),
            edges: graph.edges.iter().map(|e| [&e.source, &e.target]).collect(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}
