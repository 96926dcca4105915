use db::DbErr;
use derive_more::{Display, Error, From};

/// Request did not identify a user.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display(fmt = "user_id is required")]
pub struct MissingUserId;

/// Errors that may occur while booking a class.
#[derive(Debug, Display, From, Error)]
pub enum BookingError {
    /// Database-related error.
    Database(DbErr),

    /// Requested class does not exist.
    #[display(fmt = "class not found")]
    ClassNotFound,

    /// User already has a reservation for the class.
    #[display(fmt = "user already booked this class")]
    AlreadyBooked,

    /// User is already on the class waitlist.
    #[display(fmt = "user already in waitlist")]
    AlreadyWaitlisted,
}

/// Errors that may occur while cancelling a reservation.
#[derive(Debug, Display, From, Error)]
pub enum CancellationError {
    /// Database-related error.
    Database(DbErr),

    /// User has no confirmed reservation to cancel.
    #[display(fmt = "reservation not found or already cancelled")]
    ReservationNotFound,
}

/// Coarse classification of engine errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required identifier is missing.
    Validation,

    /// Class or reservation does not exist.
    NotFound,

    /// User already holds a seat or a waitlist entry.
    Conflict,

    /// Storage or transaction failure.
    Internal,
}

impl MissingUserId {
    /// Classify an error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

impl BookingError {
    /// Classify an error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::Database(_) => ErrorKind::Internal,
            BookingError::ClassNotFound => ErrorKind::NotFound,
            BookingError::AlreadyBooked | BookingError::AlreadyWaitlisted => ErrorKind::Conflict,
        }
    }
}

impl CancellationError {
    /// Classify an error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CancellationError::Database(_) => ErrorKind::Internal,
            CancellationError::ReservationNotFound => ErrorKind::NotFound,
        }
    }
}

/// Unwrap a user identifier supplied by a caller.
pub fn require_user(user_id: Option<i64>) -> Result<i64, MissingUserId> {
    user_id.ok_or(MissingUserId)
}

#[cfg(test)]
mod tests {
    use db::DbErr;

    use super::{require_user, BookingError, CancellationError, ErrorKind, MissingUserId};

    #[test]
    fn classifies_errors() {
        assert_eq!(MissingUserId.kind(), ErrorKind::Validation);

        let database = || DbErr::Custom(String::from("connection reset"));

        assert_eq!(
            BookingError::Database(database()).kind(),
            ErrorKind::Internal
        );
        assert_eq!(BookingError::ClassNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(BookingError::AlreadyBooked.kind(), ErrorKind::Conflict);
        assert_eq!(BookingError::AlreadyWaitlisted.kind(), ErrorKind::Conflict);

        assert_eq!(
            CancellationError::Database(database()).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            CancellationError::ReservationNotFound.kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn requires_user() {
        assert_eq!(require_user(Some(3)), Ok(3));
        assert_eq!(require_user(None), Err(MissingUserId));
        assert_eq!(MissingUserId.to_string(), "user_id is required");
    }
}
