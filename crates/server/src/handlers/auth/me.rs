use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{user, DatabaseConnection, DbErr, EntityTrait};
use derive_more::{Display, Error, From};

use crate::{accounts::UserSummary, auth::AuthenticatedUser};

/// Errors that may occur during the current user request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum CurrentUserError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// User was removed after the token had been issued.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "user not found")]
    UserNotFound,
}

/// Generate OAPI documentation for the [`me`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get the current authenticated user.")
        .response::<200, Json<UserSummary>>()
}

/// Get information about the owner of the authentication token.
pub(super) async fn me(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<UserSummary>, CurrentUserError> {
    let user = user::Entity::find_by_id(current_user.id())
        .one(&*db)
        .await?
        .ok_or(CurrentUserError::UserNotFound)?;

    Ok(Json(user.into()))
}
