//! Reservation of a seat in a class.
//!
//! There is at most one reservation row per `(class, user)` pair. Cancelled
//! reservations are never deleted, only marked with [`Status::Cancelled`].

use schemars::JsonSchema;
use sea_orm::{entity::prelude::*, ActiveValue};
use serde::Serialize;

use crate::now;

/// Reservation model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub status: Status,
    pub created_at: TimeDateTime,
}

/// Reservation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, JsonSchema)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(num_value = 0)]
    Confirmed,
    #[sea_orm(num_value = 1)]
    Cancelled,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id"
    )]
    Class,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Find the reservation of a user for a class.
///
/// When `status` is [`None`], a reservation is returned regardless of its status.
pub async fn find<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
    user_id: i64,
    status: Option<Status>,
) -> Result<Option<Model>, DbErr> {
    let mut query = Entity::find()
        .filter(Column::ClassId.eq(class_id))
        .filter(Column::UserId.eq(user_id));

    if let Some(status) = status {
        query = query.filter(Column::Status.eq(status));
    }

    query.one(db).await
}

/// Insert a new reservation.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
    user_id: i64,
    status: Status,
) -> Result<Model, DbErr> {
    Entity::insert(ActiveModel {
        class_id: ActiveValue::Set(class_id),
        user_id: ActiveValue::Set(user_id),
        status: ActiveValue::Set(status),
        created_at: ActiveValue::Set(now()),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await
}

/// Change status of an existing reservation.
pub async fn update_status<C: ConnectionTrait>(
    db: &C,
    id: i64,
    status: Status,
) -> Result<Model, DbErr> {
    ActiveModel {
        id: ActiveValue::Unchanged(id),
        status: ActiveValue::Set(status),
        ..Default::default()
    }
    .update(db)
    .await
}

/// Give a user a confirmed seat in a class.
///
/// A cancelled reservation of the same user is reactivated instead of inserting
/// a second row for the same `(class, user)` pair.
pub async fn confirm<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
    user_id: i64,
) -> Result<Model, DbErr> {
    match find(db, class_id, user_id, None).await? {
        Some(existing) if existing.status == Status::Confirmed => Ok(existing),
        Some(existing) => update_status(db, existing.id, Status::Confirmed).await,
        None => create(db, class_id, user_id, Status::Confirmed).await,
    }
}
