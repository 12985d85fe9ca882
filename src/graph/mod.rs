// src/graph/mod.rs

//! The scheduler graph engine.
//!
//! Data flows strictly through three stages:
//!
//! - [`builder`]: one candidate graph per scheduler.
//! - [`merge`]: non-root graphs folded into the roots upstream of them.
//! - [`coalesce`]: shard siblings collapsed into one node, per root graph.
//!
//! Everything here is pure and synchronous; loading descriptors and writing
//! output is the caller's business.

pub mod builder;
pub mod coalesce;
pub mod diagnostics;
pub mod merge;
pub mod node;
pub mod scheduler_def;

pub use builder::{Built, build_graphs};
pub use coalesce::{Coalesced, Coalescer, DEFAULT_SHARD_PATTERN};
pub use diagnostics::{BuildDiagnostics, CoalesceDiagnostics, Diagnostics, MergeDiagnostics};
pub use merge::{MergeOptions, Merged, merge_graphs};
pub use node::{Edge, Graph, GraphSet, NodeId};
pub use scheduler_def::{SchedulerDef, TriggerKind, Triggerables};

/// Build, merge and (optionally) coalesce in one call.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub merge: MergeOptions,
    /// `None` leaves shard nodes as they are.
    pub coalescer: Option<Coalescer>,
}

/// Root graphs plus what every stage reported.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub graphs: GraphSet,
    pub diagnostics: Diagnostics,
}

impl Pipeline {
    pub fn new(merge: MergeOptions, coalescer: Option<Coalescer>) -> Self {
        Self { merge, coalescer }
    }

    pub fn run(&self, schedulers: &[SchedulerDef], triggerables: &Triggerables) -> PipelineOutput {
        let built = build_graphs(schedulers, triggerables);
        let merged = merge_graphs(built.graphs, self.merge);

        let mut diagnostics = Diagnostics {
            build: built.diagnostics,
            merge: merged.diagnostics,
            coalesce: CoalesceDiagnostics::default(),
        };

        let graphs = match &self.coalescer {
            None => merged.graphs,
            Some(coalescer) => merged
                .graphs
                .into_iter()
                .map(|(name, graph)| {
                    let out = coalescer.coalesce(&graph);
                    diagnostics.coalesce.accumulate(out.diagnostics);
                    (name, out.graph)
                })
                .collect(),
        };

        PipelineOutput { graphs, diagnostics }
    }
}
