//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented routes into one document served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "OASF Record Services",
        version = "0.1.0",
        description = "Validation of OASF records against bundled or remote JSON Schemas, and translation of records into VS Code Copilot MCP configuration and A2A agent cards.",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::validation::validate_record,
        crate::routes::validation::validate_record_stream,
        crate::routes::translation::translate_vscode_copilot,
        crate::routes::translation::translate_a2a,
    ),
    components(schemas(
        crate::routes::validation::ValidateRecordRequest,
        crate::routes::validation::ValidateRecordResponse,
        crate::routes::translation::TranslateRecordRequest,
        crate::routes::translation::TranslateRecordResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "validation", description = "Record validation"),
        (name = "translation", description = "Record translation"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
