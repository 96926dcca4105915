use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use bcrypt::BcryptError;
use common::config::Config;
use db::{user, DatabaseConnection, DbErr};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::{
    accounts::{self, AccountDetails, AccountError, UserSummary},
    auth::AuthenticatedUser,
    schema::example_error,
    validation::ValidatedJson,
};

/// Errors that may occur during the user creation process.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum UserCreationError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Password hashing error.
    HashingError(BcryptError),

    /// Email or username is taken by another user.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "email or username already in use")]
    AlreadyInUse,
}

impl From<AccountError> for UserCreationError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Database(err) => Self::DatabaseError(err),
            AccountError::Hashing(err) => Self::HashingError(err),
            AccountError::AlreadyInUse => Self::AlreadyInUse,
        }
    }
}

/// New user details with the assigned role.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct UserCreationRequest {
    #[serde(flatten)]
    #[validate]
    details: AccountDetails,

    /// Role assigned to the user.
    #[schemars(example = "crate::schema::example_role")]
    role: user::Role,
}

/// Generate OAPI documentation for the [`create`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create a user with any role.")
        .response::<200, Json<UserSummary>>()
        .response_with::<409, Json<Value>, _>(|op| {
            op.description("Email or username is already in use.")
                .example(example_error(UserCreationError::AlreadyInUse))
        })
}

/// User creation handler.
pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUser>,
    Extension(config): Extension<Arc<Config>>,
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<UserCreationRequest>,
) -> Result<Json<UserSummary>, UserCreationError> {
    let user = accounts::create_account(
        &*db,
        request.details,
        request.role,
        config.auth.password_cost,
    )
    .await?;

    info!(
        admin_id = current_user.id(),
        user_id = user.id,
        role = ?user.role,
        "user created"
    );

    Ok(Json(user.into()))
}
