/// User authentication route.
mod login;

/// Current user information route.
mod me;

/// User registration route.
mod register;

use std::sync::Arc;

use aide::axum::{
    routing::{get_with, post_with},
    ApiRouter,
};
use axum::middleware::from_fn_with_state;
use db::{token, DatabaseConnection, DbErr, EntityTrait};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{accounts::UserSummary, auth};

/// Authentication token issued to a user.
#[derive(Serialize, JsonSchema)]
pub(super) struct AuthenticationResponse {
    /// Authentication token.
    #[schemars(example = "crate::schema::example_token")]
    token: String,

    /// Authenticated user.
    user: UserSummary,
}

/// Issue a new authentication token for the provided user.
async fn issue_token<C: db::ConnectionTrait>(
    db: &C,
    user: db::user::Model,
) -> Result<AuthenticationResponse, DbErr> {
    let (model, token) = token::generate_token(user.id);

    token::Entity::insert(model).exec_without_returning(db).await?;

    Ok(AuthenticationResponse {
        token,
        user: user.into(),
    })
}

/// Create an [`ApiRouter`] that provides an API server with authentication routes.
pub(crate) fn routes(database: Arc<DatabaseConnection>) -> ApiRouter<Arc<DatabaseConnection>> {
    let protected_routes = ApiRouter::new()
        .api_route("/me", get_with(me::me, me::docs))
        .route_layer(from_fn_with_state(
            database,
            auth::require_authentication::<false, _>,
        ));

    ApiRouter::new()
        .api_route("/login", post_with(login::login, login::docs))
        .api_route("/register", post_with(register::register, register::docs))
        .merge(protected_routes)
        .with_path_items(|op| op.tag("Authentication"))
}
