use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_derive_error::ErrorResponse;
use booking::{BookingError, BookingOutcome, MissingUserId};
use common::config::Config;
use db::{user, DatabaseConnection, DbErr, EntityTrait, QuerySelect, SelectExt};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use super::{BookingRequest, ReservationData, WaitlistEntryData};
use crate::schema::example_error;

/// Errors that may occur during the class booking process.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ClassBookingError {
    /// Database-related error.
    DatabaseError(DbErr),

    #[status(StatusCode::BAD_REQUEST)]
    #[display(fmt = "user_id is required")]
    MissingUserId,

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "user not found")]
    UserNotFound,

    #[status(StatusCode::NOT_FOUND)]
    #[display(fmt = "class not found")]
    ClassNotFound,

    #[status(StatusCode::BAD_REQUEST)]
    #[display(fmt = "user already booked this class")]
    AlreadyBooked,

    #[status(StatusCode::BAD_REQUEST)]
    #[display(fmt = "user already in waitlist")]
    AlreadyWaitlisted,
}

impl From<MissingUserId> for ClassBookingError {
    fn from(_: MissingUserId) -> Self {
        Self::MissingUserId
    }
}

impl From<BookingError> for ClassBookingError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Database(err) => Self::DatabaseError(err),
            BookingError::ClassNotFound => Self::ClassNotFound,
            BookingError::AlreadyBooked => Self::AlreadyBooked,
            BookingError::AlreadyWaitlisted => Self::AlreadyWaitlisted,
        }
    }
}

/// Result of a booking request.
#[derive(Serialize, JsonSchema)]
#[serde(untagged)]
pub(super) enum BookingResponse {
    /// User received a seat.
    Confirmed {
        /// Human-readable outcome.
        message: String,

        /// Confirmed reservation.
        reservation: ReservationData,
    },

    /// Class is full, user was added to its waitlist.
    Waitlisted {
        /// Human-readable outcome.
        message: String,

        /// Created waitlist entry.
        waitlist: WaitlistEntryData,
    },
}

impl From<BookingOutcome> for BookingResponse {
    fn from(outcome: BookingOutcome) -> Self {
        match outcome {
            BookingOutcome::Confirmed(reservation) => Self::Confirmed {
                message: String::from("Reservation confirmed"),
                reservation: reservation.into(),
            },
            BookingOutcome::Waitlisted(entry) => Self::Waitlisted {
                message: String::from("Class is full, user added to waitlist"),
                waitlist: entry.into(),
            },
        }
    }
}

/// Generate OAPI documentation for the [`book`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Book a seat in a class.")
        .description(
            r#"Confirms a reservation when the class has a free seat.
Otherwise the user is appended to the end of the class waitlist
and is promoted automatically once a seat is freed."#,
        )
        .response::<201, Json<BookingResponse>>()
        .response_with::<400, Json<Value>, _>(|op| {
            op.description("User already holds a seat or a waitlist entry.")
                .example(example_error(ClassBookingError::AlreadyBooked))
        })
        .response_with::<404, Json<Value>, _>(|op| {
            op.description("Class not found.")
                .example(example_error(ClassBookingError::ClassNotFound))
        })
}

/// Class booking handler.
pub(super) async fn book(
    Path(class_id): Path<i64>,
    State(db): State<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<Config>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ClassBookingError> {
    let user_id = booking::require_user(request.user_id)?;

    let user_exists = user::Entity::find_by_id(user_id)
        .select_only()
        .exists(&*db)
        .await?;

    if !user_exists {
        return Err(ClassBookingError::UserNotFound);
    }

    let outcome = booking::book(&db, class_id, user_id, config.booking.rebooking).await?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}
