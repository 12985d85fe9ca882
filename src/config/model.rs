// src/config/model.rs

use serde::Deserialize;

use crate::graph::{DEFAULT_SHARD_PATTERN, SchedulerDef};
use crate::types::OrphanPolicy;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [graph]
/// coalesce = true
/// orphans = "drop"
///
/// [[scheduler]]
/// name = "base"
/// builders = ["compile"]
///
/// [[scheduler]]
/// name = "tests"
/// builders = ["test 1/2", "test 2/2"]
/// kind = "dependent"
/// upstream = "base"
/// ```
///
/// Schedulers are an array of tables so their declaration order survives.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub graph: GraphSection,

    #[serde(default, rename = "scheduler")]
    pub schedulers: Vec<RawScheduler>,
}

/// `[graph]` section: how the engine post-processes graphs.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSection {
    /// Collapse shard siblings (`"test 1/2"`, `"test 2/2"`) into one node.
    #[serde(default)]
    pub coalesce: bool,

    /// Regex with a `basename` group recognising shard names.
    #[serde(default = "default_coalesce_pattern")]
    pub coalesce_pattern: String,

    /// `"drop"` (default) or `"promote"` schedulers no root reaches.
    #[serde(default)]
    pub orphans: OrphanPolicy,
}

fn default_coalesce_pattern() -> String {
    DEFAULT_SHARD_PATTERN.to_string()
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            coalesce: false,
            coalesce_pattern: default_coalesce_pattern(),
            orphans: OrphanPolicy::default(),
        }
    }
}

/// Upstream rule as spelled in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawTriggerKind {
    #[default]
    None,
    Triggerable,
    Dependent,
    Aggregating,
}

/// One `[[scheduler]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScheduler {
    pub name: String,

    /// Builders this scheduler notifies.
    #[serde(default)]
    pub builders: Vec<String>,

    #[serde(default)]
    pub kind: RawTriggerKind,

    /// Upstream scheduler name (`kind = "dependent"` only).
    #[serde(default)]
    pub upstream: Option<String>,

    /// Upstream builders (`kind = "aggregating"` only).
    #[serde(default)]
    pub upstream_builders: Option<Vec<String>>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    graph: GraphSection,
    schedulers: Vec<SchedulerDef>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(graph: GraphSection, schedulers: Vec<SchedulerDef>) -> Self {
        Self { graph, schedulers }
    }

    pub fn graph_section(&self) -> &GraphSection {
        &self.graph
    }

    /// Scheduler descriptors in declaration order.
    pub fn schedulers(&self) -> &[SchedulerDef] {
        &self.schedulers
    }
}
