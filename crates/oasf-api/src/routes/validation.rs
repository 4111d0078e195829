//! # Record Validation API
//!
//! - `POST /v1/validation/record`: one request, one response.
//! - `POST /v1/validation/record/stream`: newline-delimited JSON requests in,
//!   newline-delimited JSON responses out, in request order. The first request
//!   that cannot be answered ends the stream with a final `{"error": ...}`
//!   line; nothing after it is answered.
//!
//! An invalid record is a 200 response with `is_valid: false`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use oasf_core::Record;
use oasf_schema::{validate_stream, StreamError, ValidateRequest, ValidationOutcome};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{extract_json, split_ndjson};
use crate::state::AppState;

/// Content type of the streaming endpoint, both directions.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Request to validate one record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ValidateRecordRequest {
    /// The record. Absent means "no record" and yields an invalid outcome.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub record: Option<Record>,
    /// Schema URL overriding the record's declared `schema_version`.
    #[serde(default)]
    pub schema_url: Option<String>,
}

impl From<ValidateRecordRequest> for ValidateRequest {
    fn from(req: ValidateRecordRequest) -> Self {
        ValidateRequest {
            record: req.record,
            schema_url: req.schema_url,
        }
    }
}

/// Validation result for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidateRecordResponse {
    pub is_valid: bool,
    /// Human-readable violations; empty when valid.
    pub errors: Vec<String>,
}

impl From<ValidationOutcome> for ValidateRecordResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        Self {
            is_valid: outcome.is_valid(),
            errors: outcome.into_violations(),
        }
    }
}

/// Build the validation router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/validation/record", post(validate_record))
        .route("/v1/validation/record/stream", post(validate_record_stream))
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("oasf_validation_requests_total", "outcome" => outcome).increment(1);
}

fn outcome_label(outcome: &ValidationOutcome) -> &'static str {
    if outcome.is_valid() {
        "valid"
    } else {
        "invalid"
    }
}

/// POST /v1/validation/record
#[utoipa::path(
    post,
    path = "/v1/validation/record",
    request_body = ValidateRecordRequest,
    responses(
        (status = 200, description = "Record evaluated", body = ValidateRecordResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ErrorBody),
        (status = 422, description = "Unknown schema version", body = crate::error::ErrorBody),
        (status = 502, description = "Schema URL could not be fetched or compiled", body = crate::error::ErrorBody),
    ),
    tag = "validation"
)]
pub async fn validate_record(
    State(state): State<AppState>,
    body: Result<Json<ValidateRecordRequest>, JsonRejection>,
) -> Result<Json<ValidateRecordResponse>, AppError> {
    let req = extract_json(body)?;
    let result = state
        .engine
        .validate(req.record.as_ref(), req.schema_url.as_deref())
        .await;

    match result {
        Ok(outcome) => {
            record_outcome(outcome_label(&outcome));
            Ok(Json(outcome.into()))
        }
        Err(e) => {
            record_outcome("error");
            tracing::warn!(error = %e, "validation request failed");
            Err(e.into())
        }
    }
}

/// POST /v1/validation/record/stream
#[utoipa::path(
    post,
    path = "/v1/validation/record/stream",
    request_body(content = String, content_type = "application/x-ndjson",
        description = "One ValidateRecordRequest JSON object per line"),
    responses(
        (status = 200, description = "One ValidateRecordResponse per line, optionally ending with an ErrorBody line",
            body = String, content_type = "application/x-ndjson"),
    ),
    tag = "validation"
)]
pub async fn validate_record_stream(State(state): State<AppState>, body: String) -> Response {
    let stream_id = Uuid::new_v4();
    let span = tracing::info_span!("validation_stream", %stream_id);

    async move {
        let (requests, parse_error) = split_ndjson::<ValidateRecordRequest>(&body);
        let lines = run_stream(&state, requests, parse_error).await;
        tracing::info!(lines = lines.len(), "validation stream answered");

        let mut out = String::new();
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        ([(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)], out).into_response()
    }
    .instrument(span)
    .await
}

/// Feed parsed requests through [`validate_stream`] and render every output
/// line, including the terminating error line if any.
async fn run_stream(
    state: &AppState,
    requests: Vec<ValidateRecordRequest>,
    parse_error: Option<AppError>,
) -> Vec<String> {
    let capacity = requests.len().max(1);
    let (req_tx, req_rx) = mpsc::channel(capacity);
    let (resp_tx, mut resp_rx) = mpsc::channel(capacity);

    for req in requests {
        if req_tx.try_send(req.into()).is_err() {
            return vec![error_line(AppError::Internal(
                "validation stream buffer full".into(),
            ))];
        }
    }
    drop(req_tx);

    let result = validate_stream(&state.engine, req_rx, resp_tx).await;

    let mut lines = Vec::new();
    while let Some(outcome) = resp_rx.recv().await {
        record_outcome(outcome_label(&outcome));
        lines.push(response_line(outcome.into()));
    }

    let failure = match result {
        Ok(_) => parse_error,
        Err(StreamError::Validation { index, source }) => {
            record_outcome("error");
            tracing::warn!(index, error = %source, "validation stream aborted");
            Some(source.into())
        }
        Err(e @ StreamError::ResponseClosed { .. }) => Some(AppError::Internal(e.to_string())),
    };
    if let Some(err) = failure {
        lines.push(error_line(err));
    }
    lines
}

fn response_line(response: ValidateRecordResponse) -> String {
    serde_json::to_string(&response).unwrap_or_else(|e| {
        error_line(AppError::Internal(format!("failed to encode response: {e}")))
    })
}

fn error_line(err: AppError) -> String {
    let (_, body) = err.to_body();
    serde_json::to_string(&body).unwrap_or_else(|_| {
        r#"{"error":{"code":"INTERNAL_ERROR","message":"An internal error occurred"}}"#.to_string()
    })
}
