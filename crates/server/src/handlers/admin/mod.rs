/// Class creation route.
mod classes;

/// User creation route.
mod users;

use std::sync::Arc;

use aide::axum::{routing::post_with, ApiRouter};
use axum::middleware::from_fn_with_state;
use db::DatabaseConnection;

use crate::auth;

/// Create an [`ApiRouter`] that provides an API server with administrative routes.
///
/// Every route requires an authentication token of an administrator.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route("/users", post_with(users::create, users::docs))
        .api_route("/classes", post_with(classes::create, classes::docs))
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<true, _>,
        ))
        .with_path_items(|op| op.tag("Administration"))
}
