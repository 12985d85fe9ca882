// src/graph/merge.rs

//! Stage two: fold every non-root graph into the root graphs upstream of it.
//!
//! A non-root scheduler `s` *attaches* to another graph `g` when the source
//! endpoint of one of `s`'s edges is already a node of `g`. Attachment is
//! transitive: once `s` is folded into `g`, anything attaching to `s` ends up
//! in `g` too.
//!
//! Rather than mutating graphs while scanning them (which makes the outcome
//! depend on visiting order), we record every attachment as an edge
//! `g -> s` of a small petgraph digraph over scheduler names, using the
//! graphs as built. Each root's final graph is then the union of every graph
//! reachable from it. Nothing is mutated until the walk is done, so the
//! result cannot depend on iteration order.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use petgraph::Direction;
use tracing::{debug, info, warn};

use crate::graph::diagnostics::MergeDiagnostics;
use crate::graph::node::{Graph, GraphSet, NodeId};
use crate::types::OrphanPolicy;

/// Knobs for [`merge_graphs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub orphans: OrphanPolicy,
}

/// Output of [`merge_graphs`]: root graphs only.
#[derive(Debug, Clone, Default)]
pub struct Merged {
    pub graphs: GraphSet,
    pub diagnostics: MergeDiagnostics,
}

/// Scheduler-name digraph with an edge `g -> s` for every attachment of a
/// non-root `s` to `g`.
type Attachments<'a> = DiGraphMap<&'a str, ()>;

/// Fold non-root graphs into their roots and return the root graphs.
///
/// - A non-root graph reachable from several roots is folded into each.
/// - A non-root graph reachable from no root is an orphan; see
///   [`OrphanPolicy`].
pub fn merge_graphs(graphs: GraphSet, options: MergeOptions) -> Merged {
    let attachments = attachment_graph(&graphs);
    let mut diagnostics = MergeDiagnostics::default();
    let mut merged = GraphSet::new();
    let mut reached: BTreeMap<&str, usize> = BTreeMap::new();

    for (name, graph) in graphs.iter().filter(|(_, g)| g.is_root) {
        debug!(root = %name, "collecting graphs downstream of root");
        let (root_graph, members) = fold_reachable(name, graph, &graphs, &attachments);
        for member in members {
            *reached.entry(member).or_default() += 1;
            diagnostics.folds += 1;
        }
        merged.insert(name.clone(), root_graph);
    }

    let orphans: BTreeSet<&str> = graphs
        .iter()
        .filter(|(name, g)| !g.is_root && !reached.contains_key(name.as_str()))
        .map(|(name, _)| name.as_str())
        .collect();

    diagnostics.shared = reached
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(name, _)| name.to_string())
        .collect();
    diagnostics.orphans = orphans.iter().map(|s| s.to_string()).collect();

    for orphan in &orphans {
        warn!(scheduler = %orphan, "no root graph reaches this scheduler");
    }

    if options.orphans == OrphanPolicy::Promote {
        promote_orphans(&orphans, &graphs, &attachments, &mut merged, &mut diagnostics);
    }

    diagnostics.roots = merged.len();
    info!(
        roots = diagnostics.roots,
        folds = diagnostics.folds,
        orphans = diagnostics.orphans.len(),
        "merged scheduler graphs"
    );

    Merged {
        graphs: merged,
        diagnostics,
    }
}

fn attachment_graph(graphs: &GraphSet) -> Attachments<'_> {
    // Which schedulers' graphs contain each node.
    let mut owners: HashMap<&NodeId, Vec<&str>> = HashMap::new();
    for (name, graph) in graphs {
        for node in &graph.nodes {
            owners.entry(node).or_default().push(name.as_str());
        }
    }

    let mut attachments = Attachments::new();
    for name in graphs.keys() {
        attachments.add_node(name.as_str());
    }

    for (name, graph) in graphs.iter().filter(|(_, g)| !g.is_root) {
        for anchor in graph.anchors() {
            let Some(candidates) = owners.get(anchor) else {
                continue;
            };
            for &candidate in candidates {
                if candidate == name.as_str() {
                    continue;
                }
                debug!(
                    scheduler = %name,
                    into = %candidate,
                    anchor = %anchor,
                    "found upstream anchor"
                );
                attachments.add_edge(candidate, name.as_str(), ());
            }
        }
    }

    attachments
}

/// Union of `start`'s graph and every graph reachable from it, plus the
/// names folded in (excluding `start`).
fn fold_reachable<'a>(
    start: &'a str,
    graph: &Graph,
    graphs: &GraphSet,
    attachments: &Attachments<'a>,
) -> (Graph, Vec<&'a str>) {
    let mut folded = graph.clone();
    let mut members = Vec::new();

    let mut dfs = Dfs::new(attachments, start);
    while let Some(visited) = dfs.next(attachments) {
        if visited == start {
            continue;
        }
        if let Some(other) = graphs.get(visited) {
            debug!(scheduler = %visited, into = %start, "folding graph");
            folded.absorb(other);
            members.push(visited);
        }
    }

    (folded, members)
}

/// Emit orphans as roots of their own.
///
/// Orphans that no other orphan feeds go first, each taking its reachable
/// orphans with it. Whatever is still uncovered sits on a cycle of orphans;
/// those are promoted in name order.
fn promote_orphans<'a>(
    orphans: &BTreeSet<&'a str>,
    graphs: &'a GraphSet,
    attachments: &Attachments<'a>,
    merged: &mut GraphSet,
    diagnostics: &mut MergeDiagnostics,
) {
    let mut covered: BTreeSet<&str> = BTreeSet::new();

    let heads: Vec<&str> = orphans
        .iter()
        .copied()
        .filter(|name| {
            !attachments
                .neighbors_directed(*name, Direction::Incoming)
                .any(|from| from != *name && orphans.contains(from))
        })
        .collect();
    let rest: Vec<&str> = orphans.iter().copied().filter(|o| !heads.contains(o)).collect();

    for name in heads.into_iter().chain(rest) {
        if covered.contains(name) {
            continue;
        }
        let Some(graph) = graphs.get(name) else {
            continue;
        };
        debug!(scheduler = %name, "promoting orphan to root");
        let (mut promoted, members) = fold_reachable(name, graph, graphs, attachments);
        promoted.is_root = true;
        covered.insert(name);
        for member in members {
            covered.insert(member);
            diagnostics.folds += 1;
        }
        merged.insert(name.to_string(), promoted);
    }
}
