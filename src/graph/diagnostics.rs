// src/graph/diagnostics.rs

//! Counters returned by each engine stage.
//!
//! The engine reports what it did through these values rather than through
//! process-wide state, so callers (and tests) can observe degraded input
//! without scraping logs.

use std::fmt;

/// What [`build_graphs`](crate::graph::build_graphs) ran into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildDiagnostics {
    /// Number of graphs built (one per distinct scheduler name).
    pub schedulers: usize,
    /// Dependent schedulers whose `upstream` names no known scheduler.
    pub unresolved_upstreams: Vec<String>,
    /// Triggerable schedulers with no entry in the triggerables mapping.
    pub unresolved_triggerables: Vec<String>,
    /// Names that appeared more than once; the last descriptor wins.
    pub duplicate_names: Vec<String>,
}

/// What [`merge_graphs`](crate::graph::merge_graphs) did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeDiagnostics {
    /// Root graphs in the output (including promoted orphans).
    pub roots: usize,
    /// Number of (root, non-root) folds performed.
    pub folds: usize,
    /// Non-root schedulers folded into more than one root.
    pub shared: Vec<String>,
    /// Non-root schedulers no root reaches.
    pub orphans: Vec<String>,
}

/// What a [`Coalescer`](crate::graph::Coalescer) did to one graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoalesceDiagnostics {
    pub merged_groups: usize,
    pub rejected_groups: usize,
}

impl CoalesceDiagnostics {
    pub fn accumulate(&mut self, other: CoalesceDiagnostics) {
        self.merged_groups += other.merged_groups;
        self.rejected_groups += other.rejected_groups;
    }
}

/// Diagnostics for a whole pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub build: BuildDiagnostics,
    pub merge: MergeDiagnostics,
    /// Summed over every root graph; all zero when coalescing is off.
    pub coalesce: CoalesceDiagnostics,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "schedulers: {}", self.build.schedulers)?;
        writeln!(f, "root graphs: {}", self.merge.roots)?;
        writeln!(f, "folds: {}", self.merge.folds)?;
        if !self.build.unresolved_upstreams.is_empty() {
            writeln!(
                f,
                "unresolved upstreams: {:?}",
                self.build.unresolved_upstreams
            )?;
        }
        if !self.build.unresolved_triggerables.is_empty() {
            writeln!(
                f,
                "triggerables without a mapping: {:?}",
                self.build.unresolved_triggerables
            )?;
        }
        if !self.build.duplicate_names.is_empty() {
            writeln!(f, "duplicate names: {:?}", self.build.duplicate_names)?;
        }
        if !self.merge.shared.is_empty() {
            writeln!(f, "shared schedulers: {:?}", self.merge.shared)?;
        }
        if !self.merge.orphans.is_empty() {
            writeln!(f, "orphans: {:?}", self.merge.orphans)?;
        }
        write!(
            f,
            "coalesced groups: {} merged, {} rejected",
            self.coalesce.merged_groups, self.coalesce.rejected_groups
        )
    }
}
