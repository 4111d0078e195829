//! # Remote Schema Loader
//!
//! Fetches a schema document from a URL and compiles it for one request.
//!
//! There is no cache and no retry: every call issues a fresh GET and a fresh
//! compilation, even for a URL fetched a moment ago. Concurrent requests for
//! the same URL do independent work. The engine only sees the
//! [`SchemaFetcher`] trait, so a caching fetcher can be swapped in without
//! touching resolution logic.
//!
//! The fetch is a future owned by the caller's request. Dropping that future
//! (client disconnect, caller deadline) aborts the HTTP exchange.
//!
//! ## Referenced Documents
//!
//! Before compiling, every cross-document `$ref` in the fetched schema is
//! resolved against the enclosing `$id` (or the fetch URL) and fetched with
//! the same client and timeout. Referenced documents are followed
//! transitively; each URI is fetched once per call. A failure on a referenced
//! document is reported with that document's URL.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::compile::{CompiledSchema, SchemaOrigin};

/// Upper bound on a single schema fetch unless configured otherwise.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Error fetching or compiling a remote schema. Every fetch variant names the URL.
#[derive(Error, Debug)]
pub enum RemoteSchemaError {
    /// The HTTP client could not be constructed.
    #[error("failed to build schema HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The connection failed or the request timed out.
    #[error("failed to fetch schema from URL {url}: {source}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status other than 200.
    #[error("failed to fetch schema from URL {url}: HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// The response body is not JSON.
    #[error("failed to decode schema JSON from URL {url}: {reason}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The response body is JSON but not a valid JSON Schema.
    #[error("failed to compile schema from URL {url}: {reason}")]
    Compile {
        /// Requested URL.
        url: String,
        /// Compiler message.
        reason: String,
    },
}

/// Source of per-request schemas addressed by URL.
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    /// Fetch and compile the schema at `url`.
    async fn fetch(&self, url: &str) -> Result<CompiledSchema, RemoteSchemaError>;
}

/// [`SchemaFetcher`] backed by a `reqwest` client with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpSchemaFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpSchemaFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, RemoteSchemaError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RemoteSchemaError::ClientBuild)?;
        Ok(Self { http, timeout })
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch_document(&self, url: &str) -> Result<Value, RemoteSchemaError> {
        tracing::debug!(url, "fetching remote schema");

        let transport = |source| RemoteSchemaError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(RemoteSchemaError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&body).map_err(|e| RemoteSchemaError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Fetch every document reachable from `root` through `$ref`, keyed by
    /// absolute URI.
    async fn fetch_referenced(
        &self,
        url: &str,
        root: &Value,
    ) -> Result<HashMap<String, Value>, RemoteSchemaError> {
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(url.to_string());
        if let Some(id) = declared_id(root, url) {
            seen.insert(id);
        }

        let mut pending: Vec<String> = Vec::new();
        collect_from(root, url, &mut pending);

        let mut documents = HashMap::new();
        while let Some(uri) = pending.pop() {
            if !seen.insert(uri.clone()) {
                continue;
            }
            let document = self.fetch_document(&uri).await?;
            if let Some(id) = declared_id(&document, &uri) {
                seen.insert(id);
            }
            collect_from(&document, &uri, &mut pending);
            documents.insert(uri, document);
        }
        Ok(documents)
    }
}

/// Absolute form of a document's top-level `$id`, if any.
fn declared_id(document: &Value, url: &str) -> Option<String> {
    let id = document.get("$id").and_then(Value::as_str)?;
    let mut resolved = Url::parse(url).ok()?.join(id).ok()?;
    resolved.set_fragment(None);
    Some(resolved.to_string())
}

fn collect_from(document: &Value, url: &str, out: &mut Vec<String>) {
    if let Ok(base) = Url::parse(url) {
        collect_external_refs(document, &base, out);
    }
}

/// Push the fragment-free absolute URI of every `$ref` under `value` that
/// points outside the current document.
fn collect_external_refs(value: &Value, base: &Url, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            let scoped;
            let base = match map.get("$id").and_then(Value::as_str) {
                Some(id) => match base.join(id) {
                    Ok(joined) => {
                        scoped = joined;
                        &scoped
                    }
                    Err(_) => base,
                },
                None => base,
            };
            if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                if !reference.starts_with('#') {
                    if let Ok(mut target) = base.join(reference) {
                        target.set_fragment(None);
                        out.push(target.to_string());
                    }
                }
            }
            for child in map.values() {
                collect_external_refs(child, base, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_external_refs(item, base, out);
            }
        }
        _ => {}
    }
}

#[async_trait]
impl SchemaFetcher for HttpSchemaFetcher {
    async fn fetch(&self, url: &str) -> Result<CompiledSchema, RemoteSchemaError> {
        let mut document = self.fetch_document(url).await?;
        let referenced = self.fetch_referenced(url, &document).await?;
        if !referenced.is_empty() {
            tracing::debug!(url, count = referenced.len(), "fetched referenced schemas");
            // Relative refs in a document without `$id` resolve against the fetch URL.
            if let Value::Object(map) = &mut document {
                map.entry("$id").or_insert_with(|| Value::String(url.to_string()));
            }
        }

        let origin = SchemaOrigin::Remote {
            url: url.to_string(),
        };
        CompiledSchema::compile(origin, &document, referenced).map_err(|reason| {
            RemoteSchemaError::Compile {
                url: url.to_string(),
                reason,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetcher_keeps_configured_timeout() {
        let fetcher = HttpSchemaFetcher::new(Duration::from_secs(5)).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn malformed_url_is_a_transport_error() {
        let fetcher = HttpSchemaFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        match err {
            RemoteSchemaError::Transport { url, .. } => assert_eq!(url, "not a url"),
            other => panic!("expected Transport, got: {other}"),
        }
    }

    #[test]
    fn client_build_error_has_its_own_message() {
        let source = reqwest::Client::builder()
            .user_agent("bad\nagent")
            .build()
            .unwrap_err();
        let err = RemoteSchemaError::ClientBuild(source);
        assert!(err.to_string().starts_with("failed to build schema HTTP client"));
    }

    #[test]
    fn relative_refs_resolve_against_id() {
        let document = serde_json::json!({
            "$id": "https://schemas.example/v1/record.json",
            "properties": {
                "name": {"$ref": "name.json"},
                "skills": {"items": {"$ref": "../common/skill.json#/definitions/skill"}},
                "local": {"$ref": "#/definitions/local"}
            }
        });
        let mut refs = Vec::new();
        collect_from(&document, "https://mirror.example/record.json", &mut refs);
        refs.sort();
        assert_eq!(
            refs,
            vec![
                "https://schemas.example/common/skill.json".to_string(),
                "https://schemas.example/v1/name.json".to_string(),
            ]
        );
    }

    #[test]
    fn relative_refs_fall_back_to_fetch_url() {
        let document = serde_json::json!({"$ref": "other.json"});
        let mut refs = Vec::new();
        collect_from(&document, "https://schemas.example/a/root.json", &mut refs);
        assert_eq!(refs, vec!["https://schemas.example/a/other.json".to_string()]);
    }

    #[test]
    fn status_error_names_url_and_code() {
        let err = RemoteSchemaError::Status {
            url: "https://schemas.example/record".into(),
            status: 404,
        };
        let msg = err.to_string();
        assert!(msg.contains("https://schemas.example/record"));
        assert!(msg.contains("HTTP 404"));
    }
}
