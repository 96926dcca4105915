use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use bcrypt::BcryptError;
use common::config::Config;
use db::{user, DatabaseConnection, DbErr, TransactionErrorExt, TransactionTrait};
use derive_more::{Display, Error, From};
use serde_json::Value;
use tracing::info;

use super::{issue_token, AuthenticationResponse};
use crate::{
    accounts::{self, AccountDetails, AccountError},
    schema::example_error,
    validation::ValidatedJson,
};

/// Errors that may occur during the user registration process.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum UserRegistrationError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Password hashing error.
    HashingError(BcryptError),

    /// Email or username is taken by another user.
    #[status(StatusCode::CONFLICT)]
    #[display(fmt = "email or username already in use")]
    AlreadyInUse,
}

impl From<AccountError> for UserRegistrationError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Database(err) => Self::DatabaseError(err),
            AccountError::Hashing(err) => Self::HashingError(err),
            AccountError::AlreadyInUse => Self::AlreadyInUse,
        }
    }
}

/// Generate OAPI documentation for the [`register`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Register new user.")
        .description(
            r#"Self-registered users always receive the student role.
Teachers and administrators are created by an administrator instead."#,
        )
        .response::<200, Json<AuthenticationResponse>>()
        .response_with::<409, Json<Value>, _>(|op| {
            op.description("Email or username is already in use.")
                .example(example_error(UserRegistrationError::AlreadyInUse))
        })
}

/// User registration handler.
///
/// Returns an authentication token for the newly registered user.
pub(super) async fn register(
    State(db): State<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<Config>>,
    ValidatedJson(details): ValidatedJson<AccountDetails>,
) -> Result<Json<AuthenticationResponse>, UserRegistrationError> {
    let password_cost = config.auth.password_cost;

    let response = db
        .transaction::<_, _, UserRegistrationError>(|txn| {
            Box::pin(async move {
                let user =
                    accounts::create_account(txn, details, user::Role::Student, password_cost)
                        .await?;

                Ok(issue_token(txn, user).await?)
            })
        })
        .await
        .into_raw_result()?;

    info!(user_id = response.user.id, "user registered");

    Ok(Json(response))
}
