// src/config/triggerables.rs

//! Loading the triggerables mapping.
//!
//! Which builders fire a triggerable scheduler is only known from inside the
//! build steps, so it is supplied separately as a JSON object:
//!
//! ```json
//! { "nightly-tests": ["compile", "package"] }
//! ```

use std::path::Path;

use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::graph::Triggerables;

/// Parse a JSON object of scheduler name to builder names.
pub fn parse_triggerables(contents: &str) -> Result<Triggerables> {
    let mapping: Triggerables = serde_json::from_str(contents)?;
    Ok(mapping)
}

/// Load the mapping from `path`, or return an empty mapping when no path is
/// given.
pub fn load_triggerables(fs: &dyn FileSystem, path: Option<&Path>) -> Result<Triggerables> {
    let Some(path) = path else {
        return Ok(Triggerables::new());
    };
    let contents = fs.read_to_string(path)?;
    let mapping = parse_triggerables(&contents)?;
    debug!(path = ?path, entries = mapping.len(), "loaded triggerables");
    Ok(mapping)
}
