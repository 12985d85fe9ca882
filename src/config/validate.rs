// src/config/validate.rs

use std::collections::BTreeSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile, RawScheduler, RawTriggerKind};
use crate::errors::{Result, SchedgraphError};
use crate::graph::{Coalescer, SchedulerDef, TriggerKind};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SchedgraphError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let schedulers = raw
            .schedulers
            .iter()
            .map(scheduler_def)
            .collect::<Result<Vec<_>>>()?;
        warn_on_dangling_upstreams(&schedulers);
        warn_on_dependency_cycles(&schedulers);
        Ok(ConfigFile::new_unchecked(raw.graph, schedulers))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_schedulers(cfg)?;
    validate_names(cfg)?;
    validate_graph_section(cfg)?;
    Ok(())
}

fn ensure_has_schedulers(cfg: &RawConfigFile) -> Result<()> {
    if cfg.schedulers.is_empty() {
        return Err(SchedgraphError::ConfigError(
            "config must contain at least one [[scheduler]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_names(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = BTreeSet::new();
    for s in &cfg.schedulers {
        if s.name.trim().is_empty() {
            return Err(SchedgraphError::ConfigError(
                "scheduler name must not be empty".to_string(),
            ));
        }
        if !seen.insert(s.name.as_str()) {
            return Err(SchedgraphError::ConfigError(format!(
                "scheduler '{}' is defined more than once",
                s.name
            )));
        }
    }
    Ok(())
}

fn validate_graph_section(cfg: &RawConfigFile) -> Result<()> {
    // Compile now so a bad pattern fails at startup, not mid-run.
    Coalescer::new(&cfg.graph.coalesce_pattern)?;
    Ok(())
}

/// Map one raw entry onto the closed `TriggerKind` variant, rejecting fields
/// that belong to a different kind.
fn scheduler_def(raw: &RawScheduler) -> Result<SchedulerDef> {
    let misplaced = |field: &str| {
        SchedgraphError::ConfigError(format!(
            "scheduler '{}' sets `{}` but is not of the matching kind",
            raw.name, field
        ))
    };

    let kind = match raw.kind {
        RawTriggerKind::None | RawTriggerKind::Triggerable => {
            if raw.upstream.is_some() {
                return Err(misplaced("upstream"));
            }
            if raw.upstream_builders.is_some() {
                return Err(misplaced("upstream_builders"));
            }
            if raw.kind == RawTriggerKind::Triggerable {
                TriggerKind::Triggerable
            } else {
                TriggerKind::None
            }
        }
        RawTriggerKind::Dependent => {
            if raw.upstream_builders.is_some() {
                return Err(misplaced("upstream_builders"));
            }
            match &raw.upstream {
                Some(upstream) if !upstream.trim().is_empty() => TriggerKind::Dependent {
                    upstream: upstream.clone(),
                },
                _ => {
                    return Err(SchedgraphError::ConfigError(format!(
                        "dependent scheduler '{}' requires `upstream`",
                        raw.name
                    )));
                }
            }
        }
        RawTriggerKind::Aggregating => {
            if raw.upstream.is_some() {
                return Err(misplaced("upstream"));
            }
            match &raw.upstream_builders {
                Some(list) if !list.is_empty() => TriggerKind::Aggregating {
                    upstream_builders: list.clone(),
                },
                _ => {
                    return Err(SchedgraphError::ConfigError(format!(
                        "aggregating scheduler '{}' requires a non-empty `upstream_builders`",
                        raw.name
                    )));
                }
            }
        }
    };

    Ok(SchedulerDef::new(&raw.name, raw.builders.iter().cloned(), kind))
}

/// Unknown upstream names are not fatal: the graph builder treats them as
/// "no upstream edges". Still worth a warning.
fn warn_on_dangling_upstreams(schedulers: &[SchedulerDef]) {
    let names: BTreeSet<&str> = schedulers.iter().map(|s| s.name.as_str()).collect();
    for s in schedulers {
        if let TriggerKind::Dependent { upstream } = &s.kind {
            if !names.contains(upstream.as_str()) {
                warn!(
                    scheduler = %s.name,
                    upstream = %upstream,
                    "dependent scheduler refers to an unknown upstream scheduler"
                );
            }
        }
    }
}

fn warn_on_dependency_cycles(schedulers: &[SchedulerDef]) {
    // Edge direction: upstream -> dependent.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for s in schedulers {
        graph.add_node(s.name.as_str());
    }
    for s in schedulers {
        if let TriggerKind::Dependent { upstream } = &s.kind {
            graph.add_edge(upstream.as_str(), s.name.as_str(), ());
        }
    }

    if let Err(cycle) = toposort(&graph, None) {
        warn!(
            scheduler = %cycle.node_id(),
            "dependent schedulers form a cycle; they cannot reach a root graph"
        );
    }
}
