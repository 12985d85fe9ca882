// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod render;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_from_fs, load_triggerables};
use crate::fs::{FileSystem, RealFileSystem};
use crate::graph::{Coalescer, MergeOptions, Pipeline, PipelineOutput};
use crate::render::{renderer_for, write_graphs};
use crate::types::OrphanPolicy;

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub output: PipelineOutput,
    /// Files written; empty for `--dry-run`.
    pub written: Vec<PathBuf>,
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config + triggerables loading
/// - the build / merge / coalesce pipeline
/// - rendering one file per root graph
pub fn run(args: CliArgs) -> Result<()> {
    run_with_fs(&RealFileSystem, &args)?;
    Ok(())
}

/// [`run`] against an arbitrary filesystem.
pub fn run_with_fs(fs: &dyn FileSystem, args: &CliArgs) -> Result<RunSummary> {
    let config_path = Path::new(&args.config);
    let raw = load_from_fs(fs, config_path)
        .with_context(|| format!("loading scheduler config {:?}", config_path))?;
    let cfg = ConfigFile::try_from(raw)?;

    let triggerables = load_triggerables(fs, args.triggerables.as_deref().map(Path::new))
        .context("loading triggerables mapping")?;

    let pipeline = pipeline_for(&cfg, args)?;
    debug!(?pipeline, "pipeline configured");

    let output = pipeline.run(cfg.schedulers(), &triggerables);

    if args.dry_run {
        print_dry_run(&output);
        return Ok(RunSummary {
            output,
            written: Vec::new(),
        });
    }

    let renderer = renderer_for(args.format);
    let written = write_graphs(
        fs,
        renderer.as_ref(),
        Path::new(&args.output_dir),
        &output.graphs,
    )?;
    info!(files = written.len(), "done");

    Ok(RunSummary { output, written })
}

/// Merge `[graph]` settings with CLI overrides.
///
/// The coalesce pattern is compiled here, before any graph is built.
pub fn pipeline_for(cfg: &ConfigFile, args: &CliArgs) -> Result<Pipeline> {
    let section = cfg.graph_section();

    let coalesce = args.coalesce || args.coalesce_pattern.is_some() || section.coalesce;
    let coalescer = if coalesce {
        let pattern = args
            .coalesce_pattern
            .as_deref()
            .unwrap_or(&section.coalesce_pattern);
        Some(Coalescer::new(pattern)?)
    } else {
        None
    };

    let orphans = if args.keep_orphans {
        OrphanPolicy::Promote
    } else {
        section.orphans
    };

    Ok(Pipeline::new(MergeOptions { orphans }, coalescer))
}

/// Simple dry-run output: one line per root graph, then the diagnostics.
fn print_dry_run(output: &PipelineOutput) {
    println!("schedgraph dry-run");
    println!();

    println!("root graphs ({}):", output.graphs.len());
    for (name, graph) in &output.graphs {
        println!(
            "  - {name}: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
    }
    println!();
    println!("{}", output.diagnostics);

    debug!("dry-run complete (no files written)");
}
