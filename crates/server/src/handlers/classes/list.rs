use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, Json};
use axum_derive_error::ErrorResponse;
use db::{DatabaseConnection, DbErr};
use derive_more::{Display, Error, From};

use super::ClassData;

/// Errors that may occur during the class list request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ClassListError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// Generate OAPI documentation for the [`list`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of classes with their occupancy.")
        .description("Classes are ordered by their start time.")
        .response_with::<200, Json<Vec<ClassData>>, _>(|op| {
            op.description("Class list response.")
        })
}

/// List every class together with its reservations and waitlist.
pub(super) async fn list(
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<ClassData>>, ClassListError> {
    let rosters = booking::rosters(&*db).await?;

    Ok(Json(rosters.into_iter().map(ClassData::from).collect()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::testing::{create_class, create_database, create_user, ResponseBodyExt};

    use assert_json::{assert_json, validators};
    use axum::{body::Body, http::Request};
    use booking::book;
    use common::config::{Config, RebookingPolicy};
    use db::user;
    use tower::ServiceExt;

    #[tokio::test]
    async fn successful() {
        let db = create_database().await;

        let teacher = create_user(&db, "teacher", user::Role::Teacher).await;
        let student = create_user(&db, "student", user::Role::Student).await;
        let class_id = create_class(&db, teacher, 2).await;
        create_class(&db, teacher, 1).await;

        book(&db, class_id, student, RebookingPolicy::Forbid)
            .await
            .unwrap();

        let response = crate::app_router(Arc::new(db), Arc::new(Config::for_tests()))
            .oneshot(Request::builder().uri("/classes").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_json!(response.json().await, [
            {
                "id": 1,
                "name": "Morning yoga",
                "description": "Slow flow for all levels.",
                "date": validators::i64(|_| Ok(())),
                "capacity": 2,
                "teacher": {
                    "id": 1,
                    "name": "TEACHER",
                    "username": "teacher"
                },
                "confirmed_reservations": 1,
                "available_spots": 1,
                "waitlist_count": 0,
                "reservations": [
                    {
                        "id": 1,
                        "class_id": 1,
                        "user_id": 2,
                        "status": "confirmed",
                        "created_at": validators::i64(|_| Ok(()))
                    }
                ],
                "waitlist": []
            },
            {
                "id": 2,
                "name": "Morning yoga",
                "description": "Slow flow for all levels.",
                "date": validators::i64(|_| Ok(())),
                "capacity": 1,
                "teacher": {
                    "id": 1,
                    "name": "TEACHER",
                    "username": "teacher"
                },
                "confirmed_reservations": 0,
                "available_spots": 1,
                "waitlist_count": 0,
                "reservations": [],
                "waitlist": []
            }
        ]);
    }
}
