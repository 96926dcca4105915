use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, Json};
use axum_derive_error::ErrorResponse;
use db::{user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use derive_more::{Display, Error, From};

use super::UserData;

/// Errors that may occur during the teacher list request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum TeacherListError {
    /// Database-related error.
    DatabaseError(DbErr),
}

/// Generate OAPI documentation for the [`teachers`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get list of teachers.")
        .response_with::<200, Json<Vec<UserData>>, _>(|op| {
            op.description("Teacher list response.")
        })
}

/// List users with the teacher role.
pub(super) async fn teachers(
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<UserData>>, TeacherListError> {
    let teachers = user::Entity::find()
        .filter(user::Column::Role.eq(user::Role::Teacher))
        .order_by_asc(user::Column::Name)
        .all(&*db)
        .await?;

    Ok(Json(teachers.into_iter().map(UserData::from).collect()))
}
