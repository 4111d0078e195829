//! # oasf-cli: Command Line Interface for OASF Records
//!
//! ## Subcommands
//!
//! - `oasf validate`: validate one record file (JSON or YAML).
//! - `oasf translate`: print the VS Code Copilot or A2A artifact for a record.
//! - `oasf schemas`: list the schema versions a registry would answer for.
//!
//! ```bash
//! oasf validate agent.json
//! oasf validate agent.yaml --schema-url https://schema.oasf.agntcy.org/schema/0.6.0/objects/record
//! oasf translate agent.json --target a2a
//! ```
//!
//! Subcommands write their report to the given writer and return the process
//! exit code: 0 success, 1 invalid record, 2 operational error.

pub mod schemas;
pub mod translate;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use oasf_schema::SchemaRegistry;

/// Exit code for an operational failure.
pub const EXIT_ERROR: u8 = 2;

/// Load the schema registry from `dir`, or the bundled set when `None`.
pub fn load_registry(dir: Option<&Path>) -> Result<SchemaRegistry> {
    let registry = match dir {
        Some(dir) => SchemaRegistry::from_dir(dir)
            .with_context(|| format!("failed to load schemas from {}", dir.display()))?,
        None => SchemaRegistry::bundled().context("failed to load bundled schemas")?,
    };
    tracing::info!(versions = ?registry.versions(), "loaded schema registry");
    Ok(registry)
}
