//! # Canonical Projection: Wire-Name JSON for Schema Evaluation
//!
//! This module defines `CanonicalJson`, the JSON value a record is validated
//! as. Schemas are authored against wire field names, so every validation
//! path must go through [`CanonicalJson::project`] rather than an ad hoc
//! `serde_json::to_value` on some other representation.
//!
//! ## Invariants
//!
//! - Keys are wire names (`schema_version`, never `schemaVersion`).
//! - Unpopulated fields are absent, not `null` or `""`.
//! - Projection never mutates the record.

use serde_json::Value;

use crate::error::RecordError;
use crate::record::Record;

/// The canonical JSON projection of a [`Record`].
///
/// The inner value is private; the only constructor is
/// [`CanonicalJson::project`].
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalJson(Value);

impl CanonicalJson {
    /// Project a record into its canonical JSON form.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Projection` if serialization fails (for
    /// example a non-finite number inside extension data).
    pub fn project(record: &Record) -> Result<Self, RecordError> {
        serde_json::to_value(record)
            .map(Self)
            .map_err(RecordError::Projection)
    }

    /// Access the projected JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the projection, returning the JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl AsRef<Value> for CanonicalJson {
    fn as_ref(&self) -> &Value {
        &self.0
    }
}
