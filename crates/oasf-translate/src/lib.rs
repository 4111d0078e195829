//! # oasf-translate: Record Translation
//!
//! Turns named extension blocks of a [`Record`] into artifacts consumed by
//! third-party tools:
//!
//! - **VS Code Copilot** (`mcp.rs`): MCP server launch configuration with
//!   secret prompt inputs.
//! - **A2A** (`a2a.rs`): agent card.
//!
//! Each translator models the extension data it expects as typed structs and
//! reports every missing or malformed field as a named [`TranslationError`].
//! Records are only read.

pub mod a2a;
pub mod error;
pub mod mcp;

use std::fmt;
use std::str::FromStr;

use oasf_core::Record;
use serde_json::{json, Value};

pub use a2a::{build_a2a_card, A2aCard, A2aSkill, A2A_EXTENSION};
pub use error::TranslationError;
pub use mcp::{build_vscode_copilot_config, McpInput, McpServer, VsCodeCopilotMcpConfig, MCP_EXTENSION};

/// Translate a record into a VS Code Copilot `{"mcpConfig": {...}}` document.
pub fn record_to_vscode_copilot(record: &Record) -> Result<Value, TranslationError> {
    let config = build_vscode_copilot_config(record)?;
    Ok(json!({ "mcpConfig": serde_json::to_value(config)? }))
}

/// Translate a record into an `{"a2aCard": {...}}` document.
pub fn record_to_a2a(record: &Record) -> Result<Value, TranslationError> {
    let card = build_a2a_card(record)?;
    Ok(json!({ "a2aCard": serde_json::to_value(card)? }))
}

/// Artifact a record can be translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    VsCodeCopilot,
    A2a,
}

impl Target {
    /// All targets, in display order.
    pub const ALL: [Target; 2] = [Target::VsCodeCopilot, Target::A2a];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::VsCodeCopilot => "vscode-copilot",
            Target::A2a => "a2a",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown translation target: {s} (expected vscode-copilot or a2a)"))
    }
}

/// Translate a record into the artifact for `target`.
pub fn translate(record: &Record, target: Target) -> Result<Value, TranslationError> {
    tracing::debug!(%target, record = %record.name, "translating record");
    match target {
        Target::VsCodeCopilot => record_to_vscode_copilot(record),
        Target::A2a => record_to_a2a(record),
    }
}
