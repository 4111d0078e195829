//! # Record Translation API
//!
//! One endpoint per translation target. Each takes `{record}` and answers
//! `{data}` holding the translated artifact.

use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use oasf_core::Record;
use oasf_translate::{translate, Target};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Request to translate one record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TranslateRecordRequest {
    #[schema(value_type = Object)]
    pub record: Record,
}

/// Translated artifact.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslateRecordResponse {
    /// `{"mcpConfig": ...}` or `{"a2aCard": ...}` depending on the target.
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Build the translation router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/translation/vscode-copilot", post(translate_vscode_copilot))
        .route("/v1/translation/a2a", post(translate_a2a))
}

fn run(
    target: Target,
    body: Result<Json<TranslateRecordRequest>, JsonRejection>,
) -> Result<Json<TranslateRecordResponse>, AppError> {
    let req = extract_json(body)?;
    metrics::counter!("oasf_translation_requests_total", "target" => target.as_str()).increment(1);

    let data = translate(&req.record, target).map_err(|e| {
        tracing::warn!(%target, error = %e, "translation failed");
        AppError::from(e)
    })?;
    Ok(Json(TranslateRecordResponse { data }))
}

/// POST /v1/translation/vscode-copilot
#[utoipa::path(
    post,
    path = "/v1/translation/vscode-copilot",
    request_body = TranslateRecordRequest,
    responses(
        (status = 200, description = "VS Code Copilot MCP configuration", body = TranslateRecordResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ErrorBody),
        (status = 422, description = "Record lacks a usable MCP extension", body = crate::error::ErrorBody),
    ),
    tag = "translation"
)]
pub async fn translate_vscode_copilot(
    body: Result<Json<TranslateRecordRequest>, JsonRejection>,
) -> Result<Json<TranslateRecordResponse>, AppError> {
    run(Target::VsCodeCopilot, body)
}

/// POST /v1/translation/a2a
#[utoipa::path(
    post,
    path = "/v1/translation/a2a",
    request_body = TranslateRecordRequest,
    responses(
        (status = 200, description = "A2A agent card", body = TranslateRecordResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ErrorBody),
        (status = 422, description = "Record lacks a usable A2A extension", body = crate::error::ErrorBody),
    ),
    tag = "translation"
)]
pub async fn translate_a2a(
    body: Result<Json<TranslateRecordRequest>, JsonRejection>,
) -> Result<Json<TranslateRecordResponse>, AppError> {
    run(Target::A2a, body)
}
