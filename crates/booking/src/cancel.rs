//! Reservation cancellation and waitlist promotion.

use db::{
    class, reservation, waitlist_entry, DatabaseConnection, DatabaseTransaction, DbErr,
    TransactionErrorExt, TransactionTrait,
};
use tracing::info;

use crate::CancellationError;

/// Result of a successful cancellation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CancellationOutcome {
    /// Cancelled reservation.
    pub cancelled: reservation::Model,

    /// Reservation of the user promoted from the waitlist, if any.
    pub promoted: Option<reservation::Model>,
}

/// Cancel the confirmed reservation of a user and hand the freed seat
/// to the head of the class waitlist.
pub async fn cancel(
    db: &DatabaseConnection,
    class_id: i64,
    user_id: i64,
) -> Result<CancellationOutcome, CancellationError> {
    let outcome = db
        .transaction::<_, _, CancellationError>(|txn| {
            Box::pin(async move {
                class::find_with_roster_for_update(txn, class_id)
                    .await?
                    .ok_or(CancellationError::ReservationNotFound)?;

                let confirmed = reservation::find(
                    txn,
                    class_id,
                    user_id,
                    Some(reservation::Status::Confirmed),
                )
                .await?
                .ok_or(CancellationError::ReservationNotFound)?;

                let cancelled =
                    reservation::update_status(txn, confirmed.id, reservation::Status::Cancelled)
                        .await?;

                let promoted = promote_head(txn, class_id).await?;

                Ok(CancellationOutcome {
                    cancelled,
                    promoted,
                })
            })
        })
        .await
        .into_raw_result()?;

    info!(class_id, user_id, "reservation cancelled");

    if let Some(promoted) = &outcome.promoted {
        info!(
            class_id,
            user_id = promoted.user_id,
            reservation_id = promoted.id,
            "user promoted from waitlist"
        );
    }

    Ok(outcome)
}

/// Move the head of a class waitlist into a confirmed reservation.
///
/// The head entry is deleted and every later entry moves one position forward,
/// keeping waitlist positions contiguous. Must run inside the transaction that
/// freed the seat, after the class row was locked.
pub async fn promote_head(
    txn: &DatabaseTransaction,
    class_id: i64,
) -> Result<Option<reservation::Model>, DbErr> {
    let Some(head) = waitlist_entry::head(txn, class_id).await? else {
        return Ok(None);
    };

    let promoted = reservation::confirm(txn, class_id, head.user_id).await?;

    waitlist_entry::delete(txn, head.id).await?;
    waitlist_entry::decrement_positions_above(txn, class_id, head.position).await?;

    Ok(Some(promoted))
}
