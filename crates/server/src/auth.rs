use std::sync::Arc;

use axum::{
    extract::State,
    headers::{authorization::Bearer, Authorization},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    TypedHeader,
};
use axum_derive_error::ErrorResponse;
use db::{token, user, DatabaseConnection, DbErr};
use derive_more::{Display, Error, From};

/// User identity attached to authenticated requests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: i64,
}

impl AuthenticatedUser {
    /// Get raw user identifier value.
    pub fn id(&self) -> i64 {
        self.id
    }
}

#[derive(ErrorResponse, Display, From, Error)]
pub(super) enum AuthenticationError {
    DatabaseError(DbErr),

    #[status(StatusCode::UNAUTHORIZED)]
    #[display(fmt = "token not provided")]
    MissingAuthenticationToken,

    #[status(StatusCode::UNAUTHORIZED)]
    #[display(fmt = "invalid token")]
    InvalidAuthenticationToken,

    #[status(StatusCode::FORBIDDEN)]
    #[display(fmt = "admin access only")]
    AdminRequired,
}

/// Resolve a bearer token into an [`AuthenticatedUser`] request extension.
///
/// With `REQUIRE_ADMIN` set, users without the admin role are rejected.
pub(super) async fn require_authentication<const REQUIRE_ADMIN: bool, B>(
    State(db): State<Arc<DatabaseConnection>>,
    authorization: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, AuthenticationError> {
    let TypedHeader(authorization) =
        authorization.ok_or(AuthenticationError::MissingAuthenticationToken)?;

    let user = token::find_user(&*db, authorization.token())
        .await?
        .ok_or(AuthenticationError::InvalidAuthenticationToken)?;

    if REQUIRE_ADMIN && user.role != user::Role::Admin {
        return Err(AuthenticationError::AdminRequired);
    }

    req.extensions_mut().insert(AuthenticatedUser { id: user.id });

    Ok(next.run(req).await)
}
