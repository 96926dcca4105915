use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Json};
use axum_derive_error::ErrorResponse;
use db::{
    user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, TransactionErrorExt,
    TransactionTrait,
};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use super::{issue_token, AuthenticationResponse};
use crate::{accounts::verify_password, schema::example_error, validation::ValidatedJson};

/// Errors that may occur during the user authentication process.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum UserAuthenticationError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Unknown email or incorrect password.
    #[status(StatusCode::UNAUTHORIZED)]
    #[display(fmt = "invalid credentials")]
    InvalidCredentials,
}

/// User credentials.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct UserAuthenticationRequest {
    /// Email address.
    #[validate(email)]
    #[schemars(example = "crate::schema::example_email")]
    email: String,

    /// Plain text password.
    #[validate(length(min = 1))]
    #[schemars(example = "crate::schema::example_password")]
    password: String,
}

/// Generate OAPI documentation for the [`login`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Authenticate with email and password.")
        .response::<200, Json<AuthenticationResponse>>()
        .response_with::<401, Json<Value>, _>(|op| {
            op.description("Unknown email or incorrect password.")
                .example(example_error(UserAuthenticationError::InvalidCredentials))
        })
}

/// User authentication handler.
pub(super) async fn login(
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<UserAuthenticationRequest>,
) -> Result<Json<AuthenticationResponse>, UserAuthenticationError> {
    db.transaction(|txn| {
        Box::pin(async move {
            let user = user::Entity::find()
                .filter(user::Column::Email.eq(request.email))
                .one(txn)
                .await?
                .ok_or(UserAuthenticationError::InvalidCredentials)?;

            if !verify_password(&request.password, &user.password_hash) {
                return Err(UserAuthenticationError::InvalidCredentials);
            }

            Ok(Json(issue_token(txn, user).await?))
        })
    })
    .await
    .into_raw_result()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{
        create_database, create_user, RequestBodyExt, ResponseBodyExt, PASSWORD,
    };

    use assert_json::{assert_json, validators};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::config::Config;
    use db::{token::TOKEN_LENGTH, user};
    use serde_json::json;
    use tower::ServiceExt;

    fn login_request(email: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header("Content-Type", "application/json")
            .body(Body::from_json(json!({
                "email": email,
                "password": password
            })))
            .unwrap()
    }

    #[tokio::test]
    async fn successful() {
        let db = create_database().await;

        create_user(&db, "jane", user::Role::Teacher).await;

        let response = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
            .oneshot(login_request("jane@example.com", PASSWORD))
            .await
            .unwrap();

        assert_json!(response.json().await, {
            "token": validators::string(|val| {
                (val.len() == TOKEN_LENGTH)
                    .then_some(())
                    .ok_or(String::from("invalid length"))
            }),
            "user": {
                "id": 1,
                "name": "JANE",
                "email": "jane@example.com",
                "role": "teacher"
            }
        });
    }

    #[tokio::test]
    async fn wrong_password() {
        let db = create_database().await;

        create_user(&db, "jane", user::Role::Student).await;

        let response = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
            .oneshot(login_request("jane@example.com", "password124"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_email() {
        let db = create_database().await;

        let response = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
            .oneshot(login_request("nobody@example.com", PASSWORD))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
