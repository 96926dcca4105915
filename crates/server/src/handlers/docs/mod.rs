use std::sync::Arc;

use aide::{
    axum::{routing::get, ApiRouter},
    openapi::OpenApi,
    redoc::Redoc,
};
use axum::{Extension, Json};
use db::DatabaseConnection;

/// Location of the generated OpenAPI document.
const API_JSON_PATH: &str = "/docs/api.json";

/// Create an [`ApiRouter`] that provides an API server with documentation routes.
pub(crate) fn routes() -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .route("/", Redoc::new(API_JSON_PATH).axum_route())
        .route(
            "/api.json",
            get(|Extension(api): Extension<Arc<OpenApi>>| async move { Json(api) }),
        )
}
