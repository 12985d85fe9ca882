// src/render/mod.rs

//! Turning root graphs into files.
//!
//! The engine stops at abstract node/edge sets; a [`GraphRenderer`] turns one
//! graph into text and [`write_graphs`] writes one file per root graph,
//! named after the root scheduler.

pub mod dot;
pub mod json;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::graph::{Graph, GraphSet};
use crate::types::OutputFormat;

pub use dot::DotRenderer;
pub use json::JsonRenderer;

/// Renders a single root graph.
pub trait GraphRenderer {
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, name: &str, graph: &Graph) -> Result<String>;
}

/// Renderer for the given output format.
pub fn renderer_for(format: OutputFormat) -> Box<dyn GraphRenderer> {
    match format {
        OutputFormat::Dot => Box::new(DotRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

/// File name used for root graph `name`: path separators become `_`.
pub fn file_name_for(name: &str, extension: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    let stem = if stem.is_empty() || stem == "." || stem == ".." {
        "_".to_string()
    } else {
        stem
    };
    format!("{stem}.{extension}")
}

/// Render every graph into `out_dir` and return the written paths.
pub fn write_graphs(
    fs: &dyn FileSystem,
    renderer: &dyn GraphRenderer,
    out_dir: &Path,
    graphs: &GraphSet,
) -> Result<Vec<PathBuf>> {
    fs.create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(graphs.len());
    for (name, graph) in graphs {
        let path = out_dir.join(file_name_for(name, renderer.extension()));
        let text = renderer.render(name, graph)?;
        fs.write(&path, text.as_bytes())?;
        debug!(graph = %name, path = ?path, "wrote graph");
        written.push(path);
    }

    info!(count = written.len(), dir = ?out_dir, "wrote root graphs");
    Ok(written)
}
