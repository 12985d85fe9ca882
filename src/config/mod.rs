// src/config/mod.rs

//! Configuration loading and validation for schedgraph.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it into engine descriptors (`validate.rs`).
//! - Load the JSON triggerables mapping (`triggerables.rs`).

pub mod loader;
pub mod model;
pub mod triggerables;
pub mod validate;

pub use loader::{load_and_validate, load_from_fs, load_from_path, parse_str};
pub use model::{ConfigFile, GraphSection, RawConfigFile, RawScheduler, RawTriggerKind};
pub use triggerables::{load_triggerables, parse_triggerables};
