//! Class booking.
//!
//! A booking either takes a free seat of a class or, when every seat is taken,
//! appends the user to the end of the class waitlist.

use common::config::RebookingPolicy;
use db::{
    class, reservation, waitlist_entry, DatabaseConnection, TransactionErrorExt,
    TransactionTrait,
};
use tracing::info;

use crate::BookingError;

/// Result of a successful booking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingOutcome {
    /// User received a seat.
    Confirmed(reservation::Model),

    /// Class is full, user was added to its waitlist.
    Waitlisted(waitlist_entry::Model),
}

/// Book a class for a user.
///
/// The whole decision runs in a single transaction that starts by locking the class row,
/// so that concurrent bookings of the last free seat are serialized.
pub async fn book(
    db: &DatabaseConnection,
    class_id: i64,
    user_id: i64,
    policy: RebookingPolicy,
) -> Result<BookingOutcome, BookingError> {
    let outcome = db
        .transaction::<_, _, BookingError>(|txn| {
            Box::pin(async move {
                let roster = class::find_with_roster_for_update(txn, class_id)
                    .await?
                    .ok_or(BookingError::ClassNotFound)?;

                let previous = reservation::find(txn, class_id, user_id, None).await?;

                let reactivate = match previous {
                    Some(ref previous) if previous.status == reservation::Status::Confirmed => {
                        return Err(BookingError::AlreadyBooked);
                    }
                    Some(_) if policy == RebookingPolicy::Forbid => {
                        return Err(BookingError::AlreadyBooked);
                    }
                    Some(_) => true,
                    None => false,
                };

                if waitlist_entry::find(txn, class_id, user_id).await?.is_some() {
                    return Err(BookingError::AlreadyWaitlisted);
                }

                if roster.has_free_seat() {
                    let reservation = if reactivate {
                        reservation::confirm(txn, class_id, user_id).await?
                    } else {
                        reservation::create(txn, class_id, user_id, reservation::Status::Confirmed)
                            .await?
                    };

                    return Ok(BookingOutcome::Confirmed(reservation));
                }

                let entry = waitlist_entry::create(
                    txn,
                    class_id,
                    user_id,
                    roster.next_waitlist_position(),
                )
                .await?;

                Ok(BookingOutcome::Waitlisted(entry))
            })
        })
        .await
        .into_raw_result()?;

    match &outcome {
        BookingOutcome::Confirmed(reservation) => info!(
            class_id,
            user_id,
            reservation_id = reservation.id,
            "reservation confirmed"
        ),
        BookingOutcome::Waitlisted(entry) => info!(
            class_id,
            user_id,
            position = entry.position,
            "class is full, user added to waitlist"
        ),
    }

    Ok(outcome)
}
