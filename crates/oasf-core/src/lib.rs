//! # oasf-core: Record Model for the OASF Services
//!
//! Defines the [`Record`] document shared by the validation and translation
//! services: a versioned object graph (skills, locators, domains) with named
//! [`Extension`] blocks carrying arbitrary structured data.
//!
//! ## Key Design Principles
//!
//! 1. **Wire names only.** Every field serializes under its stable wire name
//!    (`schema_version`, `created_at`, `previous_record_cid`). JSON Schemas
//!    are authored against these names, so display names never appear in a
//!    serialized record.
//!
//! 2. **`CanonicalJson` newtype.** Schema validation consumes a
//!    [`CanonicalJson`] value, and the only way to build one is
//!    [`CanonicalJson::project`]. Unpopulated fields are omitted, so a record
//!    missing a required field produces a projection missing that key.
//!
//! 3. **Strict parsing.** Unknown fields are rejected when a record is parsed
//!    from JSON or YAML.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `oasf-*` crates (this is the leaf of the DAG).
//! - Records are never mutated by the services that consume them.

pub mod canonical;
pub mod error;
pub mod record;

pub use canonical::CanonicalJson;
pub use error::RecordError;
pub use record::{Domain, Extension, Locator, Record, Signature, Skill};
