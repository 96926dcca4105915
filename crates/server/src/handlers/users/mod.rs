/// User list route.
mod list;

/// Confirmed reservations of a user route.
mod reservations;

/// Teacher list route.
mod teachers;

use std::sync::Arc;

use aide::axum::{routing::get_with, ApiRouter};
use axum::middleware::from_fn_with_state;
use db::{user, DatabaseConnection, Date};
use schemars::JsonSchema;
use serde::Serialize;

use crate::auth;

/// Public information about a single user.
#[derive(Serialize, JsonSchema)]
pub(super) struct UserData {
    /// User identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    id: i64,

    /// Full name.
    #[schemars(example = "crate::schema::example_name")]
    name: String,

    /// Email address.
    #[schemars(example = "crate::schema::example_email")]
    email: String,

    /// Unique username.
    #[schemars(example = "crate::schema::example_username")]
    username: String,

    /// User role.
    #[schemars(example = "crate::schema::example_role")]
    role: user::Role,

    /// Birth date in `YYYY-MM-DD` format.
    #[serde(with = "crate::birth_date")]
    #[schemars(with = "String", example = "crate::schema::example_birth_date")]
    birth_date: Date,
}

impl From<user::Model> for UserData {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            username: user.username,
            role: user.role,
            birth_date: user.birth_date,
        }
    }
}

/// Create an [`ApiRouter`] that provides an API server with user browsing routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route("/", get_with(list::list, list::docs))
        .api_route("/teachers", get_with(teachers::teachers, teachers::docs))
        .api_route(
            "/:id/reservations",
            get_with(reservations::reservations, reservations::docs),
        )
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<false, _>,
        ))
        .with_path_items(|op| op.tag("Users"))
}
