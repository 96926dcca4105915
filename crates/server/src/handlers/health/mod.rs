use std::sync::Arc;

use aide::{
    axum::{routing::get_with, ApiRouter},
    transform::TransformOperation,
};
use axum::Json;
use db::DatabaseConnection;
use schemars::JsonSchema;
use serde::Serialize;

/// Service health response.
#[derive(Serialize, JsonSchema)]
pub(super) struct HealthResponse {
    /// Service status.
    status: &'static str,

    /// Human-readable status message.
    message: &'static str,
}

/// Generate OAPI documentation for the [`health`] handler.
fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Check service health.")
        .response::<200, Json<HealthResponse>>()
}

/// Report that the API server accepts requests.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "API is running",
    })
}

/// Create an [`ApiRouter`] that provides an API server with the health route.
pub(crate) fn routes() -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route("/", get_with(health, docs))
        .with_path_items(|op| op.tag("Health"))
}
