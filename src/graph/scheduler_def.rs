// src/graph/scheduler_def.rs

//! Scheduler descriptors as the graph engine sees them.

use std::collections::BTreeMap;

/// Builders that fire each triggerable scheduler, keyed by scheduler name.
///
/// This cannot be derived from the descriptors themselves (the trigger lives
/// inside a build step), so callers supply it. A missing key means "nothing
/// known to trigger this scheduler".
pub type Triggerables = BTreeMap<String, Vec<String>>;

/// How a scheduler is fed from upstream. At most one rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TriggerKind {
    /// Nothing upstream: this scheduler roots its own graph.
    #[default]
    None,
    /// Fired by the builders listed for it in [`Triggerables`].
    Triggerable,
    /// Fired when every builder of the named scheduler finishes.
    Dependent { upstream: String },
    /// Fired by an explicit list of upstream builders.
    Aggregating { upstream_builders: Vec<String> },
}

impl TriggerKind {
    pub fn is_root(&self) -> bool {
        matches!(self, TriggerKind::None)
    }
}

/// One scheduler: its name, the builders it notifies and its upstream rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerDef {
    pub name: String,
    pub builders: Vec<String>,
    pub kind: TriggerKind,
}

impl SchedulerDef {
    pub fn new<N, B, I>(name: N, builders: I, kind: TriggerKind) -> Self
    where
        N: Into<String>,
        B: Into<String>,
        I: IntoIterator<Item = B>,
    {
        Self {
            name: name.into(),
            builders: builders.into_iter().map(Into::into).collect(),
            kind,
        }
    }
}
