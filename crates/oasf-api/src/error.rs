//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps validation and translation errors to HTTP status codes with a JSON
//! body carrying a machine-readable code. Internal messages are logged, never
//! returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use oasf_schema::ValidationError;
use oasf_translate::TranslationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "BAD_REQUEST", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for some client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request was well-formed but cannot be processed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// The record declares a schema version that is not loaded (422).
    #[error("validation error: {message}")]
    UnknownSchemaVersion {
        message: String,
        available: Vec<String>,
    },

    /// A schema URL named by the caller could not be used (502).
    #[error("bad gateway: {0}")]
    BadGateway(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) | Self::UnknownSchemaVersion { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            Self::BadGateway(_) => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Status code and body for this error, logging internal failures.
    pub fn to_body(&self) -> (StatusCode, ErrorBody) {
        let (status, code) = self.status_and_code();

        let message = match self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let details = match self {
            Self::UnknownSchemaVersion { available, .. } => {
                Some(serde_json::json!({ "available_versions": available }))
            }
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_body();
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownVersion { ref available, .. } => Self::UnknownSchemaVersion {
                available: available.clone(),
                message: err.to_string(),
            },
            ValidationError::RemoteSchema(_) => Self::BadGateway(err.to_string()),
            ValidationError::Projection(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<TranslationError> for AppError {
    fn from(err: TranslationError) -> Self {
        match err {
            TranslationError::Serialize(_) => Self::Internal(err.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}
