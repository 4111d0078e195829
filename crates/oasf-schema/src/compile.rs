//! # Schema Compilation
//!
//! Turns a parsed JSON Schema document into a [`CompiledSchema`] and runs it
//! against record projections, reporting one [`Violation`] per breach.
//!
//! ## Reference Resolution
//!
//! Internal `$ref`s (`#/definitions/<name>`) are resolved by the jsonschema
//! crate natively. Cross-document `$ref`s are resolved only against the
//! documents handed to [`CompiledSchema::compile`]; any other URI is a
//! compile error. Compilation therefore never touches the network, and the
//! same schema text always yields the same validator.
//!
//! `format` is asserted under every draft, including 2019-09 and 2020-12
//! where the keyword would otherwise be an annotation.

use std::collections::HashMap;
use std::fmt;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;

/// Resolves `$ref` URIs to in-memory schema documents.
struct LocalSchemaRetriever {
    documents_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.documents_by_uri.get(uri_str) {
            return Ok(value.clone());
        }
        Err(format!("external schema reference '{uri_str}' is not available locally").into())
    }
}

/// Where a compiled schema came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOrigin {
    /// A bundled schema, keyed by version.
    Bundled { version: String },
    /// A schema fetched from a URL for a single request.
    Remote { url: String },
}

impl fmt::Display for SchemaOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled { version } => write!(f, "bundled schema {version}"),
            Self::Remote { url } => write!(f, "remote schema {url}"),
        }
    }
}

/// A single schema breach reported by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// The evaluator's own description of the breach.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// A schema document compiled into a validator.
///
/// `CompiledSchema` is `Send + Sync`; bundled instances are shared by all
/// requests without locking.
pub struct CompiledSchema {
    origin: SchemaOrigin,
    validator: Validator,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl CompiledSchema {
    /// Compile a schema document.
    ///
    /// `documents_by_uri` lists the documents that cross-document `$ref`s
    /// may resolve to.
    ///
    /// # Errors
    ///
    /// Returns the evaluator's description when the document is not a valid
    /// JSON Schema or references an unavailable document.
    pub fn compile(
        origin: SchemaOrigin,
        document: &Value,
        documents_by_uri: HashMap<String, Value>,
    ) -> Result<Self, String> {
        let mut opts = jsonschema::options();
        opts.with_retriever(LocalSchemaRetriever { documents_by_uri })
            .should_validate_formats(true);
        let validator = opts.build(document).map_err(|e| e.to_string())?;
        Ok(Self { origin, validator })
    }

    /// Compile a document that has no cross-document references.
    pub fn compile_standalone(origin: SchemaOrigin, document: &Value) -> Result<Self, String> {
        Self::compile(origin, document, HashMap::new())
    }

    /// Where this schema came from.
    pub fn origin(&self) -> &SchemaOrigin {
        &self.origin
    }

    /// Evaluate an instance, returning every breach in evaluator order.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }
}
