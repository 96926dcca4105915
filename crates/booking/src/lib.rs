//! Capacity-bounded class booking with a FIFO waitlist.
//!
//! Every operation of this crate runs as a single database transaction, which
//! begins by locking the affected class row. The following invariants hold for
//! every class between transactions:
//!
//! - count of confirmed reservations never exceeds class capacity;
//! - waitlist positions are exactly `1..=N`;
//! - waitlist is empty while there is a free seat.

pub mod book;
pub mod cancel;
mod error;
pub mod roster;

#[cfg(test)]
mod testing;

pub use book::{book, BookingOutcome};
pub use cancel::{cancel, CancellationOutcome};
pub use error::{require_user, BookingError, CancellationError, ErrorKind, MissingUserId};
pub use roster::{roster, rosters, ClassRoster};
