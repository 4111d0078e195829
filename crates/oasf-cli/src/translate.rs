//! # Translate Subcommand

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use oasf_core::Record;
use oasf_translate::{translate, Target};

/// Arguments for the `oasf translate` subcommand.
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Record file (`.json`, `.yaml` or `.yml`).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Artifact to produce: `vscode-copilot` or `a2a`.
    #[arg(long)]
    pub target: Target,
}

/// Execute the translate subcommand, printing the artifact as pretty JSON.
pub fn run_translate(args: &TranslateArgs, out: &mut dyn Write) -> Result<u8> {
    let record = Record::from_path(&args.path)
        .with_context(|| format!("failed to read record {}", args.path.display()))?;

    let artifact = translate(&record, args.target)
        .with_context(|| format!("failed to translate {} to {}", args.path.display(), args.target))?;

    writeln!(out, "{}", serde_json::to_string_pretty(&artifact)?)?;
    Ok(0)
}
