use clap::ValueEnum;
use serde::Deserialize;

/// What to do with a non-root scheduler that no root graph reaches.
///
/// - `Drop`: leave it out of the output entirely (default behaviour).
/// - `Promote`: emit it as its own root graph, keyed by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    #[default]
    Drop,
    Promote,
}

/// File format written for each root graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Graphviz DOT (`<name>.dot`).
    #[default]
    Dot,
    /// JSON node/edge listing (`<name>.json`).
    Json,
}
