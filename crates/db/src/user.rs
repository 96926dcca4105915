//! Registered user.
//!
//! Users register themselves as students, while teachers and administrators
//! are created by an existing administrator. The role of a user is fixed
//! at creation time.

use schemars::JsonSchema;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub birth_date: TimeDate,
    pub role: Role,
    pub created_at: TimeDateTime,
}

/// User role.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(num_value = 0)]
    Student,
    #[sea_orm(num_value = 1)]
    Teacher,
    #[sea_orm(num_value = 2)]
    Admin,
}

/// User model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::token::Entity")]
    Tokens,

    #[sea_orm(has_many = "super::class::Entity")]
    Classes,

    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,

    #[sea_orm(has_many = "super::waitlist_entry::Entity")]
    WaitlistEntries,
}

impl Related<super::token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
    }
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
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
