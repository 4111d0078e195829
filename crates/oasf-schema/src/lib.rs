//! # oasf-schema: Schema Resolution & Validation Engine
//!
//! Decides which JSON Schema governs a record, validates the record's
//! canonical projection against it, and aggregates the violations.
//!
//! ## Components
//!
//! - [`registry`]: the bundled schema set, compiled once at startup and
//!   keyed by version (`0.6.0.json` answers for `schema_version == "0.6.0"`).
//! - [`remote`]: fetches and compiles a schema from a URL on every call,
//!   behind the [`SchemaFetcher`] trait.
//! - [`engine`]: resolution order: explicit schema URL, then the record's
//!   declared version, then a request error listing known versions.
//! - [`stream`]: ordered validation of a request sequence that stops at the
//!   first request failure.
//!
//! ## Crate Policy
//!
//! - Depends only on `oasf-core` internally.
//! - The registry is an explicit, immutable value handed to the engine.
//!   There is no process-wide schema table.
//! - An invalid record is a successful [`ValidationOutcome`]; only malformed
//!   requests and unusable schemas are [`ValidationError`]s.
//! - Nothing in this crate retries or caches.

pub mod compile;
pub mod engine;
pub mod registry;
pub mod remote;
pub mod stream;

pub use compile::{CompiledSchema, SchemaOrigin, Violation};
pub use engine::{ValidationEngine, ValidationError, ValidationOutcome, NIL_RECORD_VIOLATION};
pub use registry::{bundled_schemas, SchemaLoadError, SchemaRegistry};
pub use remote::{HttpSchemaFetcher, RemoteSchemaError, SchemaFetcher, DEFAULT_FETCH_TIMEOUT};
pub use stream::{validate_stream, StreamError, ValidateRequest};
