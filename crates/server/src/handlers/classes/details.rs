use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{DatabaseConnection, DbErr};
use derive_more::{Display, Error, From};
use serde_json::Value;

use super::ClassData;
use crate::schema::example_error;

/// Errors that may occur during the class details request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ClassDetailsError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Requested class does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "class not found")]
    ClassNotFound,
}

/// Generate OAPI documentation for the [`details`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get class details with its occupancy.")
        .response::<200, Json<ClassData>>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Class not found.")
                .example(example_error(ClassDetailsError::ClassNotFound))
        })
}

/// Class details request handler.
pub(super) async fn details(
    Path(class_id): Path<i64>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<ClassData>, ClassDetailsError> {
    let roster = booking::roster(&*db, class_id)
        .await?
        .ok_or(ClassDetailsError::ClassNotFound)?;

    Ok(Json(roster.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{create_class, create_database, create_user, ResponseBodyExt};

    use assert_json::{assert_json, validators};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use booking::book;
    use common::config::{Config, RebookingPolicy};
    use db::user;
    use tower::ServiceExt;

    #[tokio::test]
    async fn full_class() {
        let db = create_database().await;

        let teacher = create_user(&db, "teacher", user::Role::Teacher).await;
        let class_id = create_class(&db, teacher, 1).await;

        for name in ["first", "second", "third"] {
            let user_id = create_user(&db, name, user::Role::Student).await;
            book(&db, class_id, user_id, RebookingPolicy::Forbid)
                .await
                .unwrap();
        }

        let response = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
            .oneshot(
                Request::builder()
                    .uri(format!("/classes/{class_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json!(response.json().await, {
            "id": 1,
            "name": "Morning yoga",
            "description": "Slow flow for all levels.",
            "date": validators::i64(|_| Ok(())),
            "capacity": 1,
            "teacher": {
                "id": 1,
                "name": "TEACHER",
                "username": "teacher"
            },
            "confirmed_reservations": 1,
            "available_spots": 0,
            "waitlist_count": 2,
            "reservations": [
                {
                    "id": 1,
                    "class_id": 1,
                    "user_id": 2,
                    "status": "confirmed",
                    "created_at": validators::i64(|_| Ok(()))
                }
            ],
            "waitlist": [
                {
                    "id": 1,
                    "class_id": 1,
                    "user_id": 3,
                    "position": 1,
                    "created_at": validators::i64(|_| Ok(()))
                },
                {
                    "id": 2,
                    "class_id": 1,
                    "user_id": 4,
                    "position": 2,
                    "created_at": validators::i64(|_| Ok(()))
                }
            ]
        });
    }

    #[tokio::test]
    async fn unknown() {
        let db = create_database().await;

        let response = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
            .oneshot(
                Request::builder()
                    .uri("/classes/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
