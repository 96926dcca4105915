//! User authentication token.
//!
//! A token is issued on every registration and login, and is passed to the API
//! server as a bearer token to identify the user that executes the request.
//!
//! Tokens expire after [`TOKEN_LIFESPAN`] and have their length equal to [`TOKEN_LENGTH`].

use rand::{
    distributions::{Alphanumeric, DistString},
    thread_rng,
};
use sea_orm::{entity::prelude::*, ActiveValue};
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use crate::{now, user};

pub const TOKEN_LENGTH: usize = 64;
pub const TOKEN_LIFESPAN: Duration = Duration::weeks(4);

/// Authentication token model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authentication_tokens")]
pub struct Model {
    /// Unique authentication token identifier.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Related user identifier.
    pub user_id: i64,

    /// Authentication token string value.
    #[sea_orm(unique)]
    pub token: String,

    /// Authentication token creation timestamp.
    pub created_at: TimeDateTime,
}

/// Authentication token model relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Generate new authentication token for the provided user identifier.
///
/// This function returns both an [`ActiveModel`] of an authentication token
/// and its string value.
///
/// ## Example
///
/// ```
/// use db::token::{TOKEN_LENGTH, generate_token};
///
/// let (_, token_string) = generate_token(1);
/// assert_eq!(token_string.len(), TOKEN_LENGTH);
/// ```
pub fn generate_token(user_id: i64) -> (ActiveModel, String) {
    let token = Alphanumeric.sample_string(&mut thread_rng(), TOKEN_LENGTH);

    (
        ActiveModel {
            user_id: ActiveValue::Set(user_id),
            token: ActiveValue::Set(token.clone()),
            created_at: ActiveValue::Set(now()),
            ..Default::default()
        },
        token,
    )
}

/// Find the owner of a non-expired authentication token.
pub async fn find_user<C: ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<Option<user::Model>, DbErr> {
    let now = OffsetDateTime::now_utc() - TOKEN_LIFESPAN;
    let issued_after = PrimitiveDateTime::new(now.date(), now.time());

    Ok(Entity::find()
        .filter(Column::Token.eq(token))
        .filter(Column::CreatedAt.gt(issued_after))
        .find_also_related(user::Entity)
        .one(db)
        .await?
        .and_then(|(_, user)| user))
}
