// src/graph/coalesce.rs

//! Stage three: collapse shard siblings into one node.
//!
//! Buildbot setups often split one job into shards named `"test 1/3"`,
//! `"test 2/3"`, `"test 3/3"`. When every shard is wired up identically,
//! drawing all of them adds nothing, so they are replaced by a single
//! `"test"` node.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;
use tracing::debug;

use crate::errors::{Result, SchedgraphError};
use crate::graph::diagnostics::CoalesceDiagnostics;
use crate::graph::node::{Edge, Graph, NodeId};

/// Matches a trailing `k/n` shard marker separated by whitespace, `-` or
/// `_`, capturing everything before it as `basename`.
pub const DEFAULT_SHARD_PATTERN: &str = r"^(?P<basename>.+?)[\s_-]+\d+/\d+$";

const BASENAME_GROUP: &str = "basename";

/// Output of [`Coalescer::coalesce`].
#[derive(Debug, Clone, Default)]
pub struct Coalesced {
    pub graph: Graph,
    pub diagnostics: CoalesceDiagnostics,
}

/// Compiled shard pattern plus the coalescing pass that uses it.
#[derive(Debug, Clone)]
pub struct Coalescer {
    pattern: Regex,
}

impl Default for Coalescer {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_SHARD_PATTERN).expect("default shard pattern compiles"),
        }
    }
}

impl Coalescer {
    /// Compile `pattern`. It must contain a named group `basename`; the rest
    /// of the match is the shard suffix that gets dropped.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| SchedgraphError::InvalidPattern(format!("{pattern}: {e}")))?;

        if !regex.capture_names().any(|n| n == Some(BASENAME_GROUP)) {
            return Err(SchedgraphError::InvalidPattern(format!(
                "{pattern}: missing named group `(?P<{BASENAME_GROUP}>...)`"
            )));
        }

        Ok(Self { pattern: regex })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Basename of `label` if it looks like a shard.
    pub fn basename<'l>(&self, label: &'l str) -> Option<&'l str> {
        let caps = self.pattern.captures(label)?;
        let base = caps.name(BASENAME_GROUP)?.as_str();
        (!base.is_empty()).then_some(base)
    }

    /// Return a copy of `graph` with every mergeable shard group collapsed.
    ///
    /// A group is mergeable when each member has exactly the same incident
    /// edges as the first member once the member is swapped for the first
    /// member. Any asymmetry leaves the whole group untouched.
    ///
    /// A representative can itself look like a shard (`"x 1/2 1/2"` becomes
    /// `"x 1/2"`), so passes repeat until one merges nothing. Every merge
    /// removes nodes, which bounds the number of passes.
    pub fn coalesce(&self, graph: &Graph) -> Coalesced {
        let mut current = graph.clone();
        let mut merged_groups = 0;

        loop {
            let (next, pass) = self.coalesce_pass(&current);
            merged_groups += pass.merged_groups;
            current = next;

            if pass.merged_groups == 0 {
                return Coalesced {
                    graph: current,
                    diagnostics: CoalesceDiagnostics {
                        merged_groups,
                        // Groups still split after the final pass.
                        rejected_groups: pass.rejected_groups,
                    },
                };
            }
            debug!(merged = pass.merged_groups, "coalesce pass merged groups; running another");
        }
    }

    fn coalesce_pass(&self, graph: &Graph) -> (Graph, CoalesceDiagnostics) {
        let mut diagnostics = CoalesceDiagnostics::default();

        // Representative node -> shard members, in node order.
        let mut groups: BTreeMap<NodeId, Vec<&NodeId>> = BTreeMap::new();
        for node in &graph.nodes {
            if let Some(base) = self.basename(node.label()) {
                groups.entry(node.renamed(base)).or_default().push(node);
            }
        }

        let mut rewrite: HashMap<&NodeId, NodeId> = HashMap::new();
        for (representative, members) in groups {
            if members.len() < 2 {
                continue;
            }
            debug!(group = %representative, size = members.len(), "trying to merge node group");

            if mergeable(graph, &members) {
                debug!(group = %representative, "group is mergeable");
                diagnostics.merged_groups += 1;
                for member in members {
                    rewrite.insert(member, representative.clone());
                }
            } else {
                diagnostics.rejected_groups += 1;
            }
        }

        if rewrite.is_empty() {
            return (graph.clone(), diagnostics);
        }

        let resolve = |node: &NodeId| rewrite.get(node).cloned().unwrap_or_else(|| node.clone());

        let nodes: BTreeSet<NodeId> = graph.nodes.iter().map(&resolve).collect();
        let edges: BTreeSet<Edge> = graph.edges.iter().map(|e| e.map_endpoints(&resolve)).collect();

        let out = Graph {
            nodes,
            edges,
            is_root: graph.is_root,
        };
        (out, diagnostics)
    }
}

fn mergeable(graph: &Graph, members: &[&NodeId]) -> bool {
    let Some((first, rest)) = members.split_first() else {
        return false;
    };
    let required = graph.incident_edges(first);

    rest.iter().all(|member| {
        let own = graph.incident_edges(member);
        if own.len() != required.len() {
            debug!(
                first = %first,
                member = %member,
                "number of edges differs, can't merge"
            );
            return false;
        }

        let swapped: BTreeSet<Edge> = own
            .iter()
            .map(|e| {
                e.map_endpoints(|n| {
                    if n == *member {
                        (*first).clone()
                    } else {
                        n.clone()
                    }
                })
            })
            .collect();

        let same = swapped == required;
        if !same {
            debug!(first = %first, member = %member, "edge content differs, can't merge");
        }
        same
    })
}
