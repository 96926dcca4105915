use std::error::Error;

use axum::async_trait;
use db::{class, now, token, user, ActiveValue, Database, DatabaseConnection, Date, EntityTrait};
use hyper::body::{self, Bytes, HttpBody};
use migration::MigratorTrait;
use serde::Serialize;

/// Plain text password of every user created with [`create_user`].
pub(crate) const PASSWORD: &str = "password123";

pub(crate) async fn create_database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    db
}

/// Create a user with the provided role and return its identifier.
pub(crate) async fn create_user(db: &DatabaseConnection, username: &str, role: user::Role) -> i64 {
    user::Entity::insert(user::ActiveModel {
        name: ActiveValue::Set(username.to_uppercase()),
        email: ActiveValue::Set(format!("{username}@example.com")),
        username: ActiveValue::Set(String::from(username)),
        password_hash: ActiveValue::Set(bcrypt::hash(PASSWORD, 4).expect("unable to hash")),
        birth_date: ActiveValue::Set(
            Date::from_julian_day(2_451_545).expect("invalid birth date"),
        ),
        role: ActiveValue::Set(role),
        created_at: ActiveValue::Set(now()),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await
    .expect("unable to create user")
    .id
}

/// Issue an authentication token for a user.
pub(crate) async fn create_token(db: &DatabaseConnection, user_id: i64) -> String {
    let (model, token) = token::generate_token(user_id);

    token::Entity::insert(model)
        .exec_without_returning(db)
        .await
        .expect("unable to insert token");

    token
}

/// Create a class and return its identifier.
pub(crate) async fn create_class(db: &DatabaseConnection, teacher_id: i64, capacity: i32) -> i64 {
    class::Entity::insert(class::ActiveModel {
        name: ActiveValue::Set(String::from("Morning yoga")),
        description: ActiveValue::Set(String::from("Slow flow for all levels.")),
        date: ActiveValue::Set(now()),
        capacity: ActiveValue::Set(capacity),
        teacher_id: ActiveValue::Set(teacher_id),
        created_at: ActiveValue::Set(now()),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await
    .expect("unable to create class")
    .id
}

pub(crate) trait RequestBodyExt: Sized {
    fn from_json<B: Serialize>(val: B) -> Self;
}

impl<T> RequestBodyExt for T
where
    T: HttpBody + From<Vec<u8>>,
{
    fn from_json<B: Serialize>(val: B) -> Self {
        T::from(serde_json::to_vec(&val).expect("unable to serialize"))
    }
}

#[async_trait(?Send)]
pub(crate) trait ResponseBodyExt {
    async fn bytes(self) -> Bytes;

    async fn text(self) -> String;

    async fn json(self) -> serde_json::Value;
}

#[async_trait(?Send)]
impl<T> ResponseBodyExt for T
where
    T: HttpBody,
    T::Error: Error,
{
    async fn bytes(self) -> Bytes {
        body::to_bytes(self)
            .await
            .expect("unable to convert to bytes")
    }

    async fn text(self) -> String {
        String::from_utf8(self.bytes().await.to_vec()).expect("unable to convert to text")
    }

    async fn json(self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes().await).expect("unable to convert to json")
    }
}
