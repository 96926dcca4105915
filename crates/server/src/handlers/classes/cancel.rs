use std::sync::Arc;

use aide::{transform::TransformOperation, OperationIo};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_derive_error::ErrorResponse;
use booking::{CancellationError, CancellationOutcome, MissingUserId};
use db::{DatabaseConnection, DbErr};
use derive_more::{Display, Error, From};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;

use super::{BookingRequest, ReservationData};
use crate::schema::example_error;

/// Errors that may occur during the reservation cancellation process.
#[derive(ErrorResponse, Display, From, Error, OperationIo)]
#[aide(output)]
pub(super) enum ReservationCancellationError {
    /// Database-related error.
    DatabaseError(DbErr),

    #[status(StatusCode::BAD_REQUEST)]
    #[display(fmt = "user_id is required")]
    MissingUserId,

    // Clients rely on 400 for this case, not 404.
    #[status(StatusCode::BAD_REQUEST)]
    #[display(fmt = "reservation not found or already cancelled")]
    ReservationNotFound,
}

impl From<MissingUserId> for ReservationCancellationError {
    fn from(_: MissingUserId) -> Self {
        Self::MissingUserId
    }
}

impl From<CancellationError> for ReservationCancellationError {
    fn from(err: CancellationError) -> Self {
        match err {
            CancellationError::Database(err) => Self::DatabaseError(err),
            CancellationError::ReservationNotFound => Self::ReservationNotFound,
        }
    }
}

/// Result of a cancellation request.
#[derive(Serialize, JsonSchema)]
pub(super) struct CancellationResponse {
    /// Human-readable outcome.
    message: String,

    /// Cancelled reservation.
    cancelled_reservation: ReservationData,

    /// Reservation of the user promoted from the waitlist, if any.
    promoted_reservation: Option<ReservationData>,
}

impl From<CancellationOutcome> for CancellationResponse {
    fn from(outcome: CancellationOutcome) -> Self {
        Self {
            message: String::from("Reservation cancelled successfully"),
            cancelled_reservation: outcome.cancelled.into(),
            promoted_reservation: outcome.promoted.map(ReservationData::from),
        }
    }
}

/// Generate OAPI documentation for the [`cancel`] handler.
pub(super) fn docs(op: TransformOperation) -> TransformOperation {
    op.summary("Cancel a confirmed reservation.")
        .description(
            r#"The freed seat is handed to the first user on the class waitlist,
whose reservation is returned as `promoted_reservation`."#,
        )
        .response::<200, Json<CancellationResponse>>()
        .response_with::<400, Json<Value>, _>(|op| {
            op.description("User has no confirmed reservation for the class.")
                .example(example_error(
                    ReservationCancellationError::ReservationNotFound,
                ))
        })
}

/// Reservation cancellation handler.
pub(super) async fn cancel(
    Path(class_id): Path<i64>,
    State(db): State<Arc<DatabaseConnection>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<CancellationResponse>, ReservationCancellationError> {
    let user_id = booking::require_user(request.user_id)?;

    let outcome = booking::cancel(&db, class_id, user_id).await?;

    Ok(Json(outcome.into()))
}
