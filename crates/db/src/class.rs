//! Class offering.
//!
//! A class accepts up to `capacity` confirmed reservations. Users that book a full
//! class are put on its waitlist instead, see [`waitlist_entry`](super::waitlist_entry).

use sea_orm::{entity::prelude::*, QueryOrder, QuerySelect, Select};

use crate::{reservation, waitlist_entry};

/// Class model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: String,
    pub date: TimeDateTime,
    pub capacity: i32,
    pub teacher_id: i64,
    pub created_at: TimeDateTime,
}

/// Class model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,

    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,

    #[sea_orm(has_many = "super::waitlist_entry::Entity")]
    WaitlistEntries,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl Related<super::waitlist_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WaitlistEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Class together with its current occupancy.
#[derive(Clone, Debug)]
pub struct ClassWithRoster {
    /// Class model.
    pub class: Model,

    /// Confirmed reservations, in order of creation.
    pub confirmed: Vec<reservation::Model>,

    /// Waitlist entries, ordered by position ascending.
    pub waitlist: Vec<waitlist_entry::Model>,
}

impl ClassWithRoster {
    /// Check if a class has at least one free seat.
    pub fn has_free_seat(&self) -> bool {
        (self.confirmed.len() as i64) < i64::from(self.class.capacity)
    }

    /// Position that will be assigned to the next waitlist entry.
    pub fn next_waitlist_position(&self) -> i32 {
        self.waitlist
            .iter()
            .map(|entry| entry.position)
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Find a class with its confirmed reservations and waitlist.
pub async fn find_with_roster<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
) -> Result<Option<ClassWithRoster>, DbErr> {
    let Some(class) = Entity::find_by_id(class_id).one(db).await? else {
        return Ok(None);
    };

    load_roster(db, class).await.map(Some)
}

/// Find a class with its confirmed reservations and waitlist, locking the class row
/// until the end of the current transaction.
///
/// Every write to reservations and waitlist entries of a class must be preceded by
/// this call within the same transaction, so that concurrent bookings and cancellations
/// of the same class are serialized.
pub async fn find_with_roster_for_update<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
) -> Result<Option<ClassWithRoster>, DbErr> {
    let Some(class) = find_by_id_for_update(class_id).one(db).await? else {
        return Ok(None);
    };

    load_roster(db, class).await.map(Some)
}

/// Select a class by id, taking an exclusive lock on its row.
///
/// SQLite has no row locks and drops the locking clause.
pub fn find_by_id_for_update(class_id: i64) -> Select<Entity> {
    Entity::find_by_id(class_id).lock_exclusive()
}

/// Load confirmed reservations and waitlist of an already fetched class.
pub async fn load_roster<C: ConnectionTrait>(
    db: &C,
    class: Model,
) -> Result<ClassWithRoster, DbErr> {
    let confirmed = reservation::Entity::find()
        .filter(reservation::Column::ClassId.eq(class.id))
        .filter(reservation::Column::Status.eq(reservation::Status::Confirmed))
        .order_by_asc(reservation::Column::Id)
        .all(db)
        .await?;

    let waitlist = waitlist_entry::Entity::find()
        .filter(waitlist_entry::Column::ClassId.eq(class.id))
        .order_by_asc(waitlist_entry::Column::Position)
        .all(db)
        .await?;

    Ok(ClassWithRoster {
        class,
        confirmed,
        waitlist,
    })
}
