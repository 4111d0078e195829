//! # Record Errors
//!
//! Failures while loading a record document or producing its canonical
//! projection. Every variant names the stage that failed.

use thiserror::Error;

/// Error loading, parsing, or projecting a [`Record`](crate::Record).
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record source could not be read.
    #[error("cannot read record '{path}': {source}")]
    Io {
        /// Path of the record document.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The record is not valid JSON or does not match the record shape.
    #[error("invalid record JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The record is not valid YAML or does not match the record shape.
    #[error("invalid record YAML: {0}")]
    Yaml(#[source] serde_yaml::Error),

    /// Serializing the record to its canonical projection failed.
    #[error("canonical projection failed: {0}")]
    Projection(#[source] serde_json::Error),
}
