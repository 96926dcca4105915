use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_derive_error::ErrorResponse;
use db::{
    class, now, user, ActiveValue, DatabaseConnection, DbErr, EntityTrait, OffsetDateTime,
    PrimitiveDateTime,
};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::{auth::AuthenticatedUser, schema::example_error, validation::ValidatedJson};

/// Errors that may occur during the class creation process.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ClassCreationError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Provided timestamp is out of the supported range.
    #[status(StatusCode::UNPROCESSABLE_ENTITY)]
    #[display(fmt = "invalid class date")]
    InvalidDate,

    /// Teacher with the provided identifier does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "teacher not found")]
    TeacherNotFound,

    /// Provided user exists, but is not a teacher.
    #[status(StatusCode::BAD_REQUEST)]
    #[display(fmt = "user is not a teacher")]
    NotATeacher,
}

/// New class details.
#[derive(Deserialize, Validate, JsonSchema)]
pub(super) struct ClassCreationRequest {
    /// Class name.
    #[validate(length(min = 1, max = 128))]
    #[schemars(example = "crate::schema::example_class_name")]
    name: String,

    /// Class description.
    #[serde(default)]
    #[validate(length(max = 4096))]
    #[schemars(example = "crate::schema::example_class_description")]
    description: String,

    /// Class start time as a UNIX timestamp.
    #[schemars(example = "crate::schema::example_timestamp")]
    date: i64,

    /// Maximum count of confirmed reservations.
    #[validate(range(min = 1))]
    #[schemars(example = "crate::schema::example_capacity")]
    capacity: i32,

    /// Identifier of a user with the teacher role.
    #[schemars(example = "crate::schema::example_database_identifier")]
    teacher_id: i64,
}

/// Created class identifier.
#[derive(Serialize, JsonSchema)]
pub(super) struct ClassCreationResponse {
    /// Class identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    id: i64,
}

/// Generate OAPI documentation for the [`create`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create a class.")
        .response::<200, Json<ClassCreationResponse>>()
        .response_with::<400, Json<Value>, _>(|op| {
            op.description("Provided user is not a teacher.")
                .example(example_error(ClassCreationError::NotATeacher))
        })
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Teacher not found.")
                .example(example_error(ClassCreationError::TeacherNotFound))
        })
}

/// Class creation handler.
pub(super) async fn create(
    Extension(current_user): Extension<AuthenticatedUser>,
    State(db): State<Arc<DatabaseConnection>>,
    ValidatedJson(request): ValidatedJson<ClassCreationRequest>,
) -> Result<Json<ClassCreationResponse>, ClassCreationError> {
    let date = OffsetDateTime::from_unix_timestamp(request.date)
        .map_err(|_| ClassCreationError::InvalidDate)?;

    let teacher = user::Entity::find_by_id(request.teacher_id)
        .one(&*db)
        .await?
        .ok_or(ClassCreationError::TeacherNotFound)?;

    if teacher.role != user::Role::Teacher {
        return Err(ClassCreationError::NotATeacher);
    }

    let class = class::Entity::insert(class::ActiveModel {
        name: ActiveValue::Set(request.name),
        description: ActiveValue::Set(request.description),
        date: ActiveValue::Set(PrimitiveDateTime::new(date.date(), date.time())),
        capacity: ActiveValue::Set(request.capacity),
        teacher_id: ActiveValue::Set(teacher.id),
        created_at: ActiveValue::Set(now()),
        ..Default::default()
    })
    .exec_with_returning(&*db)
    .await?;

    info!(
        admin_id = current_user.id(),
        class_id = class.id,
        teacher_id = teacher.id,
        "class created"
    );

    Ok(Json(ClassCreationResponse { id: class.id }))
}
