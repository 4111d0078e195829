//! # oasf CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use oasf_cli::schemas::{run_schemas, SchemasArgs};
use oasf_cli::translate::{run_translate, TranslateArgs};
use oasf_cli::validate::{run_validate, ValidateArgs};
use oasf_cli::EXIT_ERROR;

/// OASF record tooling.
///
/// Validates agent records against their JSON Schema and translates their
/// runtime extensions into VS Code Copilot MCP configuration or A2A cards.
#[derive(Parser, Debug)]
#[command(name = "oasf", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a record file against its schema.
    Validate(ValidateArgs),

    /// Translate a record into a third-party artifact.
    Translate(TranslateArgs),

    /// List available schema versions.
    Schemas(SchemasArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &mut stdout),
        Commands::Translate(args) => run_translate(&args, &mut stdout),
        Commands::Schemas(args) => run_schemas(&args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
