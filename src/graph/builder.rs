// src/graph/builder.rs

//! Stage one: one candidate graph per scheduler.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::graph::diagnostics::BuildDiagnostics;
use crate::graph::node::{Graph, GraphSet, NodeId};
use crate::graph::scheduler_def::{SchedulerDef, TriggerKind, Triggerables};

/// Output of [`build_graphs`].
#[derive(Debug, Clone, Default)]
pub struct Built {
    pub graphs: GraphSet,
    pub diagnostics: BuildDiagnostics,
}

/// Build a graph for every scheduler, in input order.
///
/// Each graph holds the scheduler node, an edge to every builder it
/// notifies, and an edge from every builder that feeds it:
///
/// - triggerable: the builders listed under its name in `triggerables`,
/// - dependent: the builders of the scheduler named by `upstream`,
/// - aggregating: its own `upstream_builders`.
///
/// Dangling references never fail; they just produce no upstream edges and
/// are recorded in the diagnostics.
pub fn build_graphs(schedulers: &[SchedulerDef], triggerables: &Triggerables) -> Built {
    let mut graphs = GraphSet::new();
    let mut diagnostics = BuildDiagnostics::default();
    let mut seen: BTreeSet<&str> = BTreeSet::new();

    for def in schedulers {
        debug!(scheduler = %def.name, "creating graph for scheduler");

        if !seen.insert(def.name.as_str()) {
            warn!(scheduler = %def.name, "duplicate scheduler name; later definition wins");
            diagnostics.duplicate_names.push(def.name.clone());
        }

        let graph = build_one(def, schedulers, triggerables, &mut diagnostics);
        graphs.insert(def.name.clone(), graph);
    }

    diagnostics.schedulers = graphs.len();
    info!(
        schedulers = diagnostics.schedulers,
        roots = graphs.values().filter(|g| g.is_root).count(),
        "built scheduler graphs"
    );

    Built { graphs, diagnostics }
}

fn build_one(
    def: &SchedulerDef,
    all: &[SchedulerDef],
    triggerables: &Triggerables,
    diagnostics: &mut BuildDiagnostics,
) -> Graph {
    let me = NodeId::scheduler(&def.name);
    let mut graph = Graph::new(def.kind.is_root());
    graph.add_node(me.clone());

    for builder in &def.builders {
        debug!("  adding builder: {builder}");
        graph.add_edge(me.clone(), NodeId::builder(builder));
    }

    let feeding: Vec<&String> = match &def.kind {
        TriggerKind::None => Vec::new(),
        TriggerKind::Triggerable => match triggerables.get(&def.name) {
            Some(list) => {
                debug!("  hooking up triggering builders");
                list.iter().collect()
            }
            None => {
                debug!(scheduler = %def.name, "no triggerables entry; no upstream edges");
                diagnostics.unresolved_triggerables.push(def.name.clone());
                Vec::new()
            }
        },
        TriggerKind::Dependent { upstream } => {
            debug!("  adding dependency on scheduler: {upstream}");
            let upstream_builders: Vec<&String> = all
                .iter()
                .filter(|other| &other.name == upstream)
                .flat_map(|other| other.builders.iter())
                .collect();
            if !all.iter().any(|other| &other.name == upstream) {
                warn!(
                    scheduler = %def.name,
                    upstream = %upstream,
                    "dependent scheduler names an unknown upstream"
                );
                diagnostics.unresolved_upstreams.push(def.name.clone());
            }
            upstream_builders
        }
        TriggerKind::Aggregating { upstream_builders } => {
            debug!("  adding builders from an aggregating scheduler");
            upstream_builders.iter().collect()
        }
    };

    for builder in feeding {
        debug!("    upstream builder: {builder}");
        graph.add_edge(NodeId::builder(builder), me.clone());
    }

    graph
}
