//! # Validate Subcommand
//!
//! Validates one record file against the schema its `schema_version` names,
//! or against `--schema-url` when given.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use oasf_core::Record;
use oasf_schema::{HttpSchemaFetcher, ValidationEngine};

/// Arguments for the `oasf validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Record file (`.json`, `.yaml` or `.yml`).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Validate against the schema at this URL instead of the declared version.
    #[arg(long)]
    pub schema_url: Option<String>,

    /// Directory of `<version>.json` schemas replacing the bundled set.
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,

    /// Timeout for fetching `--schema-url`, in seconds (at least 1).
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub fetch_timeout_secs: u64,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when valid, 1 when the record has violations.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let record = Record::from_path(&args.path)
        .with_context(|| format!("failed to read record {}", args.path.display()))?;

    let registry = crate::load_registry(args.schema_dir.as_deref())?;
    let fetcher = HttpSchemaFetcher::new(Duration::from_secs(args.fetch_timeout_secs))
        .context("failed to build schema fetcher")?;
    let engine = ValidationEngine::new(Arc::new(registry), Arc::new(fetcher));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    let outcome = runtime
        .block_on(engine.validate(Some(&record), args.schema_url.as_deref()))
        .with_context(|| format!("failed to validate {}", args.path.display()))?;

    if outcome.is_valid() {
        writeln!(out, "PASS: {}", args.path.display())?;
        return Ok(0);
    }

    writeln!(
        out,
        "FAIL: {} ({} violation(s))",
        args.path.display(),
        outcome.violations().len()
    )?;
    for violation in outcome.violations() {
        writeln!(out, "  {violation}")?;
    }
    Ok(1)
}
