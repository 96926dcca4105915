use std::{collections::HashMap, sync::Arc};

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use db::{
    class, reservation, user, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SelectExt,
};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use crate::{handlers::classes::TeacherData, schema::example_error};

/// Confirmed reservation of a user together with the reserved class.
#[derive(Serialize, JsonSchema)]
pub(super) struct UserReservationData {
    /// Reservation identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    reservation_id: i64,

    /// Class identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    class_id: i64,

    /// Class name.
    #[schemars(example = "crate::schema::example_class_name")]
    class_name: String,

    /// Class start time.
    #[schemars(example = "crate::schema::example_timestamp")]
    date: i64,

    /// Class teacher.
    teacher: Option<TeacherData>,
}

/// Errors that may occur during the user reservation list request.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum UserReservationsError {
    /// Database-related error.
    DatabaseError(DbErr),

    /// Requested user does not exist.
    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "user not found")]
    UserNotFound,
}

/// Generate OAPI documentation for the [`reservations`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get confirmed reservations of a user.")
        .description("Reservations are ordered by class start time.")
        .response::<200, Json<Vec<UserReservationData>>>()
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("User not found.")
                .example(example_error(UserReservationsError::UserNotFound))
        })
}

/// List confirmed reservations of the provided user.
pub(super) async fn reservations(
    Path(user_id): Path<i64>,
    State(db): State<Arc<DatabaseConnection>>,
) -> Result<Json<Vec<UserReservationData>>, UserReservationsError> {
    let user_exists = user::Entity::find_by_id(user_id)
        .select_only()
        .exists(&*db)
        .await?;

    if !user_exists {
        return Err(UserReservationsError::UserNotFound);
    }

    let reservations = class::Entity::find()
        .inner_join(reservation::Entity)
        .filter(reservation::Column::UserId.eq(user_id))
        .filter(reservation::Column::Status.eq(reservation::Status::Confirmed))
        .select_also(reservation::Entity)
        .order_by_asc(class::Column::Date)
        .order_by_asc(class::Column::Id)
        .all(&*db)
        .await?;

    let teachers: HashMap<i64, user::Model> = user::Entity::find()
        .filter(
            user::Column::Id.is_in(
                reservations
                    .iter()
                    .map(|(class, _)| class.teacher_id)
                    .collect::<Vec<_>>(),
            ),
        )
        .all(&*db)
        .await?
        .into_iter()
        .map(|teacher| (teacher.id, teacher))
        .collect();

    let data = reservations
        .into_iter()
        .filter_map(|(class, reservation)| {
            let reservation = reservation?;

            Some(UserReservationData {
                reservation_id: reservation.id,
                class_id: class.id,
                class_name: class.name,
                date: class.date.assume_utc().unix_timestamp(),
                teacher: teachers.get(&class.teacher_id).cloned().map(TeacherData::from),
            })
        })
        .collect();

    Ok(Json(data))
}
