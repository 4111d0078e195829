//! # Schemas Subcommand

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

/// Arguments for the `oasf schemas` subcommand.
#[derive(Args, Debug)]
pub struct SchemasArgs {
    /// Directory of `<version>.json` schemas replacing the bundled set.
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,
}

/// List the schema versions the registry answers for, one per line.
pub fn run_schemas(args: &SchemasArgs, out: &mut dyn Write) -> Result<u8> {
    let registry = crate::load_registry(args.schema_dir.as_deref())?;
    for version in registry.versions() {
        writeln!(out, "{version}")?;
    }
    Ok(0)
}
