//! Waitlist entry of a full class.
//!
//! Positions of a class waitlist are 1-based and contiguous: a new entry is appended
//! at `max(position) + 1`, and removing an entry shifts every later entry down by one.

use sea_orm::{entity::prelude::*, sea_query::Expr, ActiveValue, QueryOrder};

use crate::now;

/// Waitlist entry model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "waitlist_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub user_id: i64,
    pub position: i32,
    pub created_at: TimeDateTime,
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

/// Find the waitlist entry of a user for a class.
pub async fn find<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
    user_id: i64,
) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::ClassId.eq(class_id))
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Find the waitlist entry with the lowest position for a class.
pub async fn head<C: ConnectionTrait>(db: &C, class_id: i64) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::ClassId.eq(class_id))
        .order_by_asc(Column::Position)
        .one(db)
        .await
}

/// Insert a new waitlist entry.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
    user_id: i64,
    position: i32,
) -> Result<Model, DbErr> {
    Entity::insert(ActiveModel {
        class_id: ActiveValue::Set(class_id),
        user_id: ActiveValue::Set(user_id),
        position: ActiveValue::Set(position),
        created_at: ActiveValue::Set(now()),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await
}

/// Delete a waitlist entry by its identifier.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<(), DbErr> {
    Entity::delete_by_id(id).exec(db).await?;

    Ok(())
}

/// Move every waitlist entry of a class placed after `position` one place forward.
///
/// Returns the number of shifted entries.
pub async fn decrement_positions_above<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
    position: i32,
) -> Result<u64, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::Position, Expr::col(Column::Position).sub(1))
        .filter(Column::ClassId.eq(class_id))
        .filter(Column::Position.gt(position))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
