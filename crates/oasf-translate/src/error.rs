//! # Translation Errors

use thiserror::Error;

/// Error translating a record into a third-party artifact.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The record has no extension block with the required name.
    #[error("{kind} extension not found in record")]
    ExtensionNotFound {
        /// Short label of the artifact kind (`MCP`, `A2A`).
        kind: &'static str,
    },

    /// A required field is absent from the extension data.
    #[error("invalid or missing '{field}' in {kind} extension data")]
    MissingField {
        /// Short label of the artifact kind.
        kind: &'static str,
        /// Dotted path of the missing field.
        field: String,
    },

    /// A field is present but has the wrong shape.
    #[error("'{field}' in {kind} extension data is invalid: {reason}")]
    InvalidField {
        /// Short label of the artifact kind.
        kind: &'static str,
        /// Dotted path of the offending field.
        field: String,
        /// What was expected.
        reason: String,
    },

    /// An MCP server entry has no command.
    #[error("missing 'command' for server '{0}'")]
    MissingServerCommand(String),

    /// The translated artifact could not be serialized.
    #[error("failed to serialize translation output: {0}")]
    Serialize(#[from] serde_json::Error),
}
