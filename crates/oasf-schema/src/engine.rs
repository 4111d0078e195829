//! # Validation Engine
//!
//! Resolves the schema that governs a record and validates the record's
//! canonical projection against it.
//!
//! ## Resolution Order
//!
//! First match wins:
//!
//! 1. No record: the outcome is invalid with [`NIL_RECORD_VIOLATION`]. No
//!    schema is consulted.
//! 2. A non-empty explicit schema URL: the schema comes from the
//!    [`SchemaFetcher`]. Fetch failures are request errors, never violations.
//! 3. Otherwise the record's `schema_version` is looked up in the
//!    [`SchemaRegistry`]. An unknown version is a request error listing the
//!    versions that do exist.
//!
//! An invalid record is a successful [`ValidationOutcome`] whose violations
//! explain why. Validity is binary.

use std::sync::Arc;

use oasf_core::{CanonicalJson, Record, RecordError};
use thiserror::Error;

use crate::compile::CompiledSchema;
use crate::registry::SchemaRegistry;
use crate::remote::{RemoteSchemaError, SchemaFetcher};

/// Violation reported when the request carries no record.
pub const NIL_RECORD_VIOLATION: &str = "record cannot be nil";

/// Prefix on every schema violation string.
const VIOLATION_PREFIX: &str = "JSON Schema: ";

/// Result of validating one record.
///
/// `is_valid()` is true exactly when `violations()` is empty. Violations are
/// in the order the evaluator reported them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    violations: Vec<String>,
}

impl ValidationOutcome {
    /// Build an outcome from a list of violations.
    pub fn from_violations(violations: Vec<String>) -> Self {
        Self { violations }
    }

    /// Outcome for a request without a record.
    pub fn nil_record() -> Self {
        Self::from_violations(vec![NIL_RECORD_VIOLATION.to_string()])
    }

    /// Whether the record satisfied its schema.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable violations, in evaluator order.
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Consume the outcome, returning the violations.
    pub fn into_violations(self) -> Vec<String> {
        self.violations
    }
}

/// A validation request that could not be evaluated.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// No explicit schema URL and the record's version is not bundled.
    #[error("no schema found for version {version}. Available versions: {available:?}")]
    UnknownVersion {
        /// The record's declared `schema_version`.
        version: String,
        /// Versions known to the registry, sorted.
        available: Vec<String>,
    },

    /// The explicit schema URL could not be fetched or compiled.
    #[error("schema URL validation failed: {0}")]
    RemoteSchema(#[from] RemoteSchemaError),

    /// The record could not be projected to canonical JSON.
    #[error("JSON schema validation failed: {0}")]
    Projection(#[from] RecordError),
}

/// Validates records against bundled or remote schemas.
///
/// Cloning is cheap: the registry and fetcher are shared.
#[derive(Clone)]
pub struct ValidationEngine {
    registry: Arc<SchemaRegistry>,
    fetcher: Arc<dyn SchemaFetcher>,
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("versions", &self.registry.versions())
            .finish_non_exhaustive()
    }
}

impl ValidationEngine {
    /// Create an engine over a pre-built registry and a fetcher for explicit
    /// schema URLs.
    pub fn new(registry: Arc<SchemaRegistry>, fetcher: Arc<dyn SchemaFetcher>) -> Self {
        Self { registry, fetcher }
    }

    /// The registry this engine resolves declared versions against.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validate a record, resolving its schema as described in the module
    /// docs.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownVersion` when no explicit URL is
    /// given and the declared version is not in the registry, and
    /// `ValidationError::RemoteSchema` when the explicit URL cannot be
    /// fetched or compiled.
    pub async fn validate(
        &self,
        record: Option<&Record>,
        schema_url: Option<&str>,
    ) -> Result<ValidationOutcome, ValidationError> {
        let Some(record) = record else {
            return Ok(ValidationOutcome::nil_record());
        };

        match schema_url.filter(|url| !url.is_empty()) {
            Some(url) => {
                let schema = self.fetcher.fetch(url).await?;
                evaluate(record, &schema)
            }
            None => {
                let schema = self.registry.get(&record.schema_version).ok_or_else(|| {
                    ValidationError::UnknownVersion {
                        version: record.schema_version.clone(),
                        available: self
                            .registry
                            .versions()
                            .into_iter()
                            .map(str::to_string)
                            .collect(),
                    }
                })?;
                evaluate(record, schema)
            }
        }
    }
}

fn evaluate(record: &Record, schema: &CompiledSchema) -> Result<ValidationOutcome, ValidationError> {
    let projection = CanonicalJson::project(record)?;
    let violations: Vec<String> = schema
        .violations(projection.as_value())
        .into_iter()
        .map(|v| format!("{VIOLATION_PREFIX}{v}"))
        .collect();

    tracing::debug!(
        schema = %schema.origin(),
        violations = violations.len(),
        "evaluated record"
    );

    Ok(ValidationOutcome::from_violations(violations))
}
