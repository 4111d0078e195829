//! # Schema Registry
//!
//! The version → validator map built once at startup.
//!
//! ## Resource Naming
//!
//! A resource named `<version>.json` answers for records whose
//! `schema_version` is `<version>`. Resources with any other suffix are
//! ignored. The bundled set is compiled into the binary; a directory of
//! schema files can be loaded instead with [`SchemaRegistry::from_dir`].
//!
//! ## Lifecycle
//!
//! Loading is pure initialization with no retry. Once built the registry is
//! never mutated, so it can be shared behind an `Arc` by any number of
//! concurrent readers. A registry always holds at least one schema.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::compile::{CompiledSchema, SchemaOrigin};

/// Suffix that marks a resource as a schema document.
pub const SCHEMA_FILE_SUFFIX: &str = ".json";

const BUNDLED_LOCATION: &str = "bundled schema set";

static BUNDLED: &[(&str, &str)] = &[
    ("0.5.0.json", include_str!("../schemas/0.5.0.json")),
    ("0.6.0.json", include_str!("../schemas/0.6.0.json")),
];

/// The schema documents compiled into this crate, as `(filename, bytes)`.
pub fn bundled_schemas() -> impl Iterator<Item = (&'static str, &'static [u8])> {
    BUNDLED.iter().map(|(name, text)| (*name, text.as_bytes()))
}

/// Error building a [`SchemaRegistry`].
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// The resource collection could not be listed.
    #[error("cannot enumerate schema resources at '{location}': {reason}")]
    Enumerate {
        /// Directory or resource set being listed.
        location: String,
        /// Underlying failure.
        reason: String,
    },

    /// A schema resource could not be read.
    #[error("cannot read schema resource '{name}': {reason}")]
    Read {
        /// Resource filename.
        name: String,
        /// Underlying failure.
        reason: String,
    },

    /// A schema resource is not valid JSON.
    #[error("schema resource '{name}' is not valid JSON: {reason}")]
    InvalidJson {
        /// Resource filename.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// A schema resource is JSON but not a valid JSON Schema.
    #[error("failed to compile schema '{name}': {reason}")]
    Compile {
        /// Resource filename.
        name: String,
        /// Compiler message.
        reason: String,
    },

    /// Two resources map to the same version key.
    #[error("duplicate schema version '{version}'")]
    DuplicateVersion {
        /// The repeated version key.
        version: String,
    },

    /// No schema resources were found.
    #[error("no valid JSON schema files found in {location}")]
    Empty {
        /// Directory or resource set that was searched.
        location: String,
    },
}

/// Immutable mapping from schema version to compiled schema.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, CompiledSchema>,
}

impl SchemaRegistry {
    /// Build the registry from the schemas bundled with this crate.
    pub fn bundled() -> Result<Self, SchemaLoadError> {
        Self::load_from(BUNDLED_LOCATION, bundled_schemas())
    }

    /// Build a registry from a named collection of `(filename, bytes)`
    /// resources.
    ///
    /// # Errors
    ///
    /// Fails if any schema resource is malformed, if two resources share a
    /// version key, or if no schema resources are present.
    pub fn load<I, N, B>(resources: I) -> Result<Self, SchemaLoadError>
    where
        I: IntoIterator<Item = (N, B)>,
        N: AsRef<str>,
        B: AsRef<[u8]>,
    {
        Self::load_from("schema resource set", resources)
    }

    /// Build a registry from every `*.json` file in `dir`.
    ///
    /// Subdirectories and files with other suffixes are ignored.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SchemaLoadError> {
        let dir = dir.as_ref();
        let location = dir.display().to_string();
        let enumerate_err = |e: std::io::Error| SchemaLoadError::Enumerate {
            location: location.clone(),
            reason: e.to_string(),
        };

        let mut resources = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(enumerate_err)? {
            let path = entry.map_err(enumerate_err)?.path();
            if path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(SCHEMA_FILE_SUFFIX) {
                continue;
            }
            let bytes = std::fs::read(&path).map_err(|e| SchemaLoadError::Read {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
            resources.push((name.to_string(), bytes));
        }

        Self::load_from(&location, resources)
    }

    fn load_from<I, N, B>(location: &str, resources: I) -> Result<Self, SchemaLoadError>
    where
        I: IntoIterator<Item = (N, B)>,
        N: AsRef<str>,
        B: AsRef<[u8]>,
    {
        // Parse everything first so that documents can `$ref` each other by `$id`.
        let mut documents: BTreeMap<String, (String, Value)> = BTreeMap::new();
        for (name, bytes) in resources {
            let name = name.as_ref();
            let Some(version) = name.strip_suffix(SCHEMA_FILE_SUFFIX) else {
                continue;
            };
            let document: Value = serde_json::from_slice(bytes.as_ref()).map_err(|e| {
                SchemaLoadError::InvalidJson {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            })?;
            if documents
                .insert(version.to_string(), (name.to_string(), document))
                .is_some()
            {
                return Err(SchemaLoadError::DuplicateVersion {
                    version: version.to_string(),
                });
            }
        }

        if documents.is_empty() {
            return Err(SchemaLoadError::Empty {
                location: location.to_string(),
            });
        }

        let documents_by_uri: HashMap<String, Value> = documents
            .values()
            .filter_map(|(_, doc)| {
                doc.get("$id")
                    .and_then(Value::as_str)
                    .map(|id| (id.to_string(), doc.clone()))
            })
            .collect();

        let mut schemas = BTreeMap::new();
        for (version, (name, document)) in documents {
            let origin = SchemaOrigin::Bundled {
                version: version.clone(),
            };
            let compiled = CompiledSchema::compile(origin, &document, documents_by_uri.clone())
                .map_err(|reason| SchemaLoadError::Compile { name, reason })?;
            schemas.insert(version, compiled);
        }

        tracing::info!(
            location,
            versions = ?schemas.keys().collect::<Vec<_>>(),
            "loaded schema registry"
        );

        Ok(Self { schemas })
    }

    /// Look up the schema for a version.
    pub fn get(&self, version: &str) -> Option<&CompiledSchema> {
        self.schemas.get(version)
    }

    /// Whether a schema exists for a version.
    pub fn contains(&self, version: &str) -> bool {
        self.schemas.contains_key(version)
    }

    /// All known versions, sorted.
    pub fn versions(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Number of compiled schemas. Never zero.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Never true for a constructed registry.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
