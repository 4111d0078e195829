//! # VS Code Copilot MCP Configuration
//!
//! Builds the `mcp.json` shape VS Code Copilot reads from the record's MCP
//! runtime extension.
//!
//! ## Extension Data Shape
//!
//! ```json
//! {"servers": {"<name>": {"command": "docker", "args": ["run"], "env": {"TOKEN": "${input:token}"}}}}
//! ```
//!
//! `servers` and each server's `command` are required. `args` and `env` are
//! optional but must be a list of strings and a map of strings when present.
//! Server entries that are not objects are skipped. Every env value of the
//! form `${input:<id>}` becomes a secret prompt input.

use std::collections::BTreeMap;

use oasf_core::Record;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TranslationError;

/// Name of the MCP runtime extension block.
pub const MCP_EXTENSION: &str = "schema.oasf.agntcy.org/features/runtime/mcp";

const KIND: &str = "MCP";
const INPUT_PREFIX: &str = "${input:";

/// VS Code Copilot MCP configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VsCodeCopilotMcpConfig {
    pub servers: BTreeMap<String, McpServer>,
    pub inputs: Vec<McpInput>,
}

/// One MCP server launch definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McpServer {
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

/// A value VS Code prompts the user for before launching a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpInput {
    pub id: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub password: bool,
    pub description: String,
}

impl McpInput {
    fn secret(id: &str) -> Self {
        Self {
            id: id.to_string(),
            input_type: "promptString".to_string(),
            password: true,
            description: format!("Secret value for {id}"),
        }
    }
}

/// Build the VS Code Copilot MCP configuration from a record.
///
/// Servers and inputs are emitted in name order, env keys within a server
/// in key order.
pub fn build_vscode_copilot_config(
    record: &Record,
) -> Result<VsCodeCopilotMcpConfig, TranslationError> {
    let ext = record
        .extension(MCP_EXTENSION)
        .ok_or(TranslationError::ExtensionNotFound { kind: KIND })?;

    let servers = ext
        .data
        .as_ref()
        .and_then(|data| data.get("servers"))
        .ok_or_else(|| TranslationError::MissingField {
            kind: KIND,
            field: "servers".into(),
        })?
        .as_object()
        .ok_or_else(|| invalid("servers", "expected an object"))?;

    let mut config = VsCodeCopilotMcpConfig::default();
    for (name, value) in servers {
        let Some(server) = value.as_object() else {
            tracing::warn!(server = %name, "skipping MCP server entry that is not an object");
            continue;
        };
        let server = parse_server(name, server)?;
        config.inputs.extend(
            server
                .env
                .values()
                .filter_map(|v| input_id(v))
                .map(McpInput::secret),
        );
        config.servers.insert(name.clone(), server);
    }

    Ok(config)
}

fn parse_server(name: &str, server: &Map<String, Value>) -> Result<McpServer, TranslationError> {
    let command = server
        .get("command")
        .ok_or_else(|| TranslationError::MissingServerCommand(name.to_string()))?
        .as_str()
        .ok_or_else(|| invalid(&format!("servers.{name}.command"), "expected a string"))?
        .to_string();

    let args = match server.get("args") {
        None => Vec::new(),
        Some(value) => {
            let field = format!("servers.{name}.args");
            value
                .as_array()
                .ok_or_else(|| invalid(&field, "expected a list"))?
                .iter()
                .map(|arg| {
                    arg.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(&field, "expected a list of strings"))
                })
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let env = match server.get("env") {
        None => BTreeMap::new(),
        Some(value) => {
            let field = format!("servers.{name}.env");
            value
                .as_object()
                .ok_or_else(|| invalid(&field, "expected an object"))?
                .iter()
                .map(|(key, v)| {
                    v.as_str()
                        .map(|s| (key.clone(), s.to_string()))
                        .ok_or_else(|| invalid(&format!("{field}.{key}"), "expected a string"))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()?
        }
    };

    Ok(McpServer { command, args, env })
}

/// Extract `<id>` from `${input:<id>}`.
fn input_id(value: &str) -> Option<&str> {
    value
        .strip_prefix(INPUT_PREFIX)
        .map(|rest| rest.strip_suffix('}').unwrap_or(rest))
}

fn invalid(field: &str, reason: &str) -> TranslationError {
    TranslationError::InvalidField {
        kind: KIND,
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
