/// Class booking route.
mod book;

/// Reservation cancellation route.
mod cancel;

/// Class occupancy route.
mod details;

/// Class list route.
mod list;

use std::sync::Arc;

use aide::axum::{
    routing::{get_with, post_with},
    ApiRouter,
};
use booking::{roster::Teacher, ClassRoster};
use db::{reservation, user, waitlist_entry, DatabaseConnection, PrimitiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Convert a timestamp column value into a UNIX timestamp.
fn unix_timestamp(value: PrimitiveDateTime) -> i64 {
    value.assume_utc().unix_timestamp()
}

/// Teacher of a class.
#[derive(Serialize, JsonSchema)]
pub(crate) struct TeacherData {
    /// Teacher identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    id: i64,

    /// Full name.
    #[schemars(example = "crate::schema::example_name")]
    name: String,

    /// Unique username.
    #[schemars(example = "crate::schema::example_username")]
    username: String,
}

impl From<Teacher> for TeacherData {
    fn from(teacher: Teacher) -> Self {
        Self {
            id: teacher.id,
            name: teacher.name,
            username: teacher.username,
        }
    }
}

impl From<user::Model> for TeacherData {
    fn from(user: user::Model) -> Self {
        Teacher::from(user).into()
    }
}

/// Reservation of a seat in a class.
#[derive(Serialize, JsonSchema)]
pub(super) struct ReservationData {
    /// Reservation identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    id: i64,

    /// Class identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    class_id: i64,

    /// User identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    user_id: i64,

    /// Reservation status.
    #[schemars(example = "crate::schema::example_reservation_status")]
    status: reservation::Status,

    /// Reservation creation time.
    #[schemars(example = "crate::schema::example_timestamp")]
    created_at: i64,
}

impl From<reservation::Model> for ReservationData {
    fn from(reservation: reservation::Model) -> Self {
        Self {
            id: reservation.id,
            class_id: reservation.class_id,
            user_id: reservation.user_id,
            status: reservation.status,
            created_at: unix_timestamp(reservation.created_at),
        }
    }
}

/// Waitlist entry of a class.
#[derive(Serialize, JsonSchema)]
pub(super) struct WaitlistEntryData {
    /// Waitlist entry identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    id: i64,

    /// Class identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    class_id: i64,

    /// User identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    user_id: i64,

    /// 1-based position, the lowest position is promoted first.
    #[schemars(example = "crate::schema::example_waitlist_position")]
    position: i32,

    /// Waitlist entry creation time.
    #[schemars(example = "crate::schema::example_timestamp")]
    created_at: i64,
}

impl From<waitlist_entry::Model> for WaitlistEntryData {
    fn from(entry: waitlist_entry::Model) -> Self {
        Self {
            id: entry.id,
            class_id: entry.class_id,
            user_id: entry.user_id,
            position: entry.position,
            created_at: unix_timestamp(entry.created_at),
        }
    }
}

/// Class information with its current occupancy.
#[derive(Serialize, JsonSchema)]
pub(super) struct ClassData {
    /// Class identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    id: i64,

    /// Class name.
    #[schemars(example = "crate::schema::example_class_name")]
    name: String,

    /// Class description.
    #[schemars(example = "crate::schema::example_class_description")]
    description: String,

    /// Class start time.
    #[schemars(example = "crate::schema::example_timestamp")]
    date: i64,

    /// Maximum count of confirmed reservations.
    #[schemars(example = "crate::schema::example_capacity")]
    capacity: i32,

    /// Class teacher.
    teacher: Option<TeacherData>,

    /// Count of confirmed reservations.
    #[schemars(example = "crate::schema::example_available_spots")]
    confirmed_reservations: u64,

    /// Count of seats that can be booked without joining the waitlist.
    #[schemars(example = "crate::schema::example_available_spots")]
    available_spots: u64,

    /// Count of users on the waitlist.
    #[schemars(example = "crate::schema::example_available_spots")]
    waitlist_count: u64,

    /// Confirmed reservations.
    reservations: Vec<ReservationData>,

    /// Waitlist entries ordered by position.
    waitlist: Vec<WaitlistEntryData>,
}

impl From<ClassRoster> for ClassData {
    fn from(roster: ClassRoster) -> Self {
        let confirmed_reservations = roster.confirmed_reservations();
        let available_spots = roster.available_spots();
        let waitlist_count = roster.waitlist_count();

        Self {
            id: roster.class.id,
            name: roster.class.name,
            description: roster.class.description,
            date: unix_timestamp(roster.class.date),
            capacity: roster.class.capacity,
            teacher: roster.teacher.map(TeacherData::from),
            confirmed_reservations,
            available_spots,
            waitlist_count,
            reservations: roster
                .confirmed
                .into_iter()
                .map(ReservationData::from)
                .collect(),
            waitlist: roster
                .waitlist
                .into_iter()
                .map(WaitlistEntryData::from)
                .collect(),
        }
    }
}

/// User selection for booking and cancellation requests.
#[derive(Deserialize, JsonSchema)]
pub(super) struct BookingRequest {
    /// Identifier of the user that books or cancels a seat.
    #[serde(default, alias = "userId")]
    #[schemars(example = "crate::schema::example_database_identifier")]
    user_id: Option<i64>,
}

/// Create an [`ApiRouter`] that provides an API server with class routes.
pub(crate) fn routes() -> ApiRouter<Arc<DatabaseConnection>> {
    ApiRouter::new()
        .api_route("/", get_with(list::list, list::docs))
        .api_route("/:id", get_with(details::details, details::docs))
        .api_route("/:id/book", post_with(book::book, book::docs))
        .api_route("/:id/cancel", post_with(cancel::cancel, cancel::docs))
        .with_path_items(|op| op.tag("Classes"))
}
