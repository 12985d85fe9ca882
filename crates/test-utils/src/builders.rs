#![allow(dead_code)]

use schedgraph::config::{ConfigFile, GraphSection, RawConfigFile, RawScheduler, RawTriggerKind};
use schedgraph::graph::{Edge, Graph, NodeId, SchedulerDef, TriggerKind, Triggerables};

/// Plain root scheduler.
pub fn root(name: &str, builders: &[&str]) -> SchedulerDef {
    SchedulerDef::new(name, builders.iter().copied(), TriggerKind::None)
}

pub fn triggerable(name: &str, builders: &[&str]) -> SchedulerDef {
    SchedulerDef::new(name, builders.iter().copied(), TriggerKind::Triggerable)
}

pub fn dependent(name: &str, builders: &[&str], upstream: &str) -> SchedulerDef {
    SchedulerDef::new(
        name,
        builders.iter().copied(),
        TriggerKind::Dependent {
            upstream: upstream.to_string(),
        },
    )
}

pub fn aggregating(name: &str, builders: &[&str], upstream_builders: &[&str]) -> SchedulerDef {
    SchedulerDef::new(
        name,
        builders.iter().copied(),
        TriggerKind::Aggregating {
            upstream_builders: upstream_builders.iter().map(|s| s.to_string()).collect(),
        },
    )
}

pub fn triggerables(entries: &[(&str, &[&str])]) -> Triggerables {
    entries
        .iter()
        .map(|(name, builders)| {
            (
                name.to_string(),
                builders.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect()
}

/// `s:<name>` is a scheduler node, anything else a builder node.
pub fn node(spec: &str) -> NodeId {
    match spec.strip_prefix("s:") {
        Some(name) => NodeId::scheduler(name),
        None => NodeId::builder(spec),
    }
}

/// Graph from node and edge specs in the [`node`] notation.
pub fn graph(is_root: bool, nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
    let mut g = Graph::new(is_root);
    for n in nodes {
        g.add_node(node(n));
    }
    for (from, to) in edges {
        g.add_edge(node(from), node(to));
    }
    g
}

pub fn edge(from: &str, to: &str) -> Edge {
    Edge::new(node(from), node(to))
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                graph: GraphSection::default(),
                schedulers: Vec::new(),
            },
        }
    }

    pub fn with_scheduler(mut self, scheduler: RawScheduler) -> Self {
        self.config.schedulers.push(scheduler);
        self
    }

    pub fn with_coalesce(mut self, val: bool) -> Self {
        self.config.graph.coalesce = val;
        self
    }

    pub fn with_coalesce_pattern(mut self, pattern: &str) -> Self {
        self.config.graph.coalesce_pattern = pattern.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RawScheduler`.
pub struct RawSchedulerBuilder {
    scheduler: RawScheduler,
}

impl RawSchedulerBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            scheduler: RawScheduler {
                name: name.to_string(),
                builders: vec![],
                kind: RawTriggerKind::None,
                upstream: None,
                upstream_builders: None,
            },
        }
    }

    pub fn builder(mut self, builder: &str) -> Self {
        self.scheduler.builders.push(builder.to_string());
        self
    }

    pub fn kind(mut self, kind: RawTriggerKind) -> Self {
        self.scheduler.kind = kind;
        self
    }

    pub fn upstream(mut self, upstream: &str) -> Self {
        self.scheduler.upstream = Some(upstream.to_string());
        self
    }

    pub fn upstream_builder(mut self, builder: &str) -> Self {
        self.scheduler
            .upstream_builders
            .get_or_insert_with(Vec::new)
            .push(builder.to_string());
        self
    }

    pub fn build(self) -> RawScheduler {
        self.scheduler
    }
}
