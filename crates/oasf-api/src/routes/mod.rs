//! # API Route Modules
//!
//! - `validation`: single-record and NDJSON-stream record validation.
//! - `translation`: record translation to VS Code Copilot MCP configuration
//!   and A2A agent cards.

pub mod translation;
pub mod validation;
