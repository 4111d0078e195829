//! # Stream Validation
//!
//! Validates a sequence of requests arriving on one logical connection.
//!
//! ## Ordering
//!
//! Requests are processed one at a time, so the k-th response is always the
//! answer to the k-th request. An invalid record is an ordinary response.
//! The first request that fails with a [`ValidationError`] ends the stream:
//! nothing after it is read or answered, and the failure is returned to the
//! caller together with its position.

use oasf_core::Record;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::engine::{ValidationEngine, ValidationError, ValidationOutcome};

/// One validation request: an optional record and an optional schema URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateRequest {
    #[serde(default)]
    pub record: Option<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_url: Option<String>,
}

/// Why a validation stream ended early.
#[derive(Error, Debug)]
pub enum StreamError {
    /// Request number `index` (zero-based) could not be validated.
    #[error("failed to validate record {index}: {source}")]
    Validation {
        /// Position of the failing request.
        index: usize,
        /// The request failure.
        #[source]
        source: ValidationError,
    },

    /// The response receiver went away before the stream finished.
    #[error("failed to send response {index}: receiver closed")]
    ResponseClosed {
        /// Position of the response that could not be delivered.
        index: usize,
    },
}

/// Validate every request from `requests`, sending one outcome per request
/// to `responses` in arrival order.
///
/// Returns the number of requests answered once `requests` is closed.
///
/// # Errors
///
/// Stops at the first request failure and returns
/// `StreamError::Validation`; responses for earlier requests have already
/// been sent. Returns `StreamError::ResponseClosed` if `responses` is closed.
pub async fn validate_stream(
    engine: &ValidationEngine,
    mut requests: mpsc::Receiver<ValidateRequest>,
    responses: mpsc::Sender<ValidationOutcome>,
) -> Result<usize, StreamError> {
    let mut index = 0;
    while let Some(request) = requests.recv().await {
        let outcome = engine
            .validate(request.record.as_ref(), request.schema_url.as_deref())
            .await
            .map_err(|source| StreamError::Validation { index, source })?;

        responses
            .send(outcome)
            .await
            .map_err(|_| StreamError::ResponseClosed { index })?;
        index += 1;
    }

    tracing::debug!(answered = index, "validation stream finished");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::registry::SchemaRegistry;
    use crate::remote::{HttpSchemaFetcher, DEFAULT_FETCH_TIMEOUT};

    fn engine() -> ValidationEngine {
        let registry = SchemaRegistry::load([(
            "1.0.0.json",
            r#"{"type": "object", "required": ["name"]}"#,
        )])
        .unwrap();
        let fetcher = HttpSchemaFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        ValidationEngine::new(Arc::new(registry), Arc::new(fetcher))
    }

    fn request(name: &str, version: &str) -> ValidateRequest {
        ValidateRequest {
            record: Some(Record {
                name: name.into(),
                schema_version: version.into(),
                ..Record::default()
            }),
            schema_url: None,
        }
    }

    #[tokio::test]
    async fn answers_every_request_in_order() {
        let engine = engine();
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(8);

        req_tx.send(request("a", "1.0.0")).await.unwrap();
        req_tx.send(request("", "1.0.0")).await.unwrap();
        req_tx.send(ValidateRequest::default()).await.unwrap();
        drop(req_tx);

        let answered = validate_stream(&engine, req_rx, resp_tx).await.unwrap();
        assert_eq!(answered, 3);

        let first = resp_rx.recv().await.unwrap();
        let second = resp_rx.recv().await.unwrap();
        let third = resp_rx.recv().await.unwrap();
        assert!(first.is_valid());
        assert!(!second.is_valid());
        assert_eq!(third, ValidationOutcome::nil_record());
        assert!(resp_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn empty_stream_finishes_cleanly() {
        let engine = engine();
        let (req_tx, req_rx) = mpsc::channel::<ValidateRequest>(1);
        let (resp_tx, mut resp_rx) = mpsc::channel(1);
        drop(req_tx);

        assert_eq!(validate_stream(&engine, req_rx, resp_tx).await.unwrap(), 0);
        assert!(resp_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn failing_request_aborts_remaining_stream() {
        let engine = engine();
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(8);

        req_tx.send(request("a", "1.0.0")).await.unwrap();
        req_tx.send(request("b", "1.0.0")).await.unwrap();
        req_tx.send(request("c", "9.9.9")).await.unwrap();
        req_tx.send(request("d", "1.0.0")).await.unwrap();
        drop(req_tx);

        let err = validate_stream(&engine, req_rx, resp_tx).await.unwrap_err();
        match err {
            StreamError::Validation { index, source } => {
                assert_eq!(index, 2);
                assert!(matches!(source, ValidationError::UnknownVersion { .. }));
            }
            other => panic!("expected Validation, got: {other}"),
        }

        assert!(resp_rx.recv().await.unwrap().is_valid());
        assert!(resp_rx.recv().await.unwrap().is_valid());
        assert!(resp_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn closed_receiver_stops_stream() {
        let engine = engine();
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, resp_rx) = mpsc::channel(8);
        drop(resp_rx);

        req_tx.send(request("a", "1.0.0")).await.unwrap();
        drop(req_tx);

        let err = validate_stream(&engine, req_rx, resp_tx).await.unwrap_err();
        assert!(matches!(err, StreamError::ResponseClosed { index: 0 }));
    }

    #[test]
    fn request_deserializes_without_record() {
        let req: ValidateRequest = serde_json::from_str(r#"{"schema_url": ""}"#).unwrap();
        assert!(req.record.is_none());
        assert_eq!(req.schema_url.as_deref(), Some(""));
    }
}
