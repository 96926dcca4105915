pub mod class;
pub mod reservation;
pub mod token;
pub mod user;
pub mod waitlist_entry;

use std::error::Error;

use async_trait::async_trait;
pub use sea_orm::{
    sea_query, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, Database,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, StatementBuilder, TransactionError, TransactionTrait, TryGetableMany,
};
pub use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Current UTC time in the representation used by timestamp columns.
pub fn now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();

    PrimitiveDateTime::new(now.date(), now.time())
}

pub trait TransactionErrorExt<T, E> {
    /// Convert transaction [`Result`] into a [`Result`] with
    /// a custom error.
    fn into_raw_result(self) -> Result<T, E>;
}

impl<T, E> TransactionErrorExt<T, E> for Result<T, TransactionError<E>>
where
    E: Error + From<DbErr>,
{
    fn into_raw_result(self) -> Result<T, E> {
        match self {
            Ok(val) => Ok(val),
            Err(TransactionError::Connection(err)) => Err(err.into()),
            Err(TransactionError::Transaction(err)) => Err(err),
        }
    }
}

#[async_trait]
pub trait SelectExt {
    /// Check if at least one record that satisfies a query.
    async fn exists<C: ConnectionTrait + Send>(self, db: &C) -> Result<bool, DbErr>;
}

#[async_trait]
impl<T> SelectExt for T
where
    T: QueryTrait<QueryStatement = sea_query::SelectStatement> + Send,
{
    async fn exists<C: ConnectionTrait + Send>(self, db: &C) -> Result<bool, DbErr> {
        use sea_query::{Expr, Query};

        let mut query = self.into_query();

        // Fix failing tests with SQLite by returning at least some expr
        query.expr(1);

        let stmt = StatementBuilder::build(
            Query::select().expr(Expr::exists(query)),
            &db.get_database_backend(),
        );

        db.query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::Custom(String::from("EXISTS query returned no rows")))?
            .try_get_by_index(0)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, QuerySelect, Schema};

    use time::Month;

    use crate::{class, now, reservation, user, waitlist_entry, ActiveValue, Date, SelectExt};

    async fn create_database() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("unable to create test database");

        let builder = db.get_database_backend();
        let schema = Schema::new(builder);

        for stmt in [
            schema.create_table_from_entity(user::Entity),
            schema.create_table_from_entity(class::Entity),
            schema.create_table_from_entity(reservation::Entity),
            schema.create_table_from_entity(waitlist_entry::Entity),
        ] {
            db.execute(builder.build(&stmt))
                .await
                .expect("unable to create table");
        }

        db
    }

    async fn create_user(db: &DatabaseConnection, username: &str) -> i64 {
        user::Entity::insert(user::ActiveModel {
            name: ActiveValue::Set(String::from(username)),
            email: ActiveValue::Set(format!("{username}@example.com")),
            username: ActiveValue::Set(String::from(username)),
            password_hash: ActiveValue::Set(String::new()),
            birth_date: ActiveValue::Set(
                Date::from_calendar_date(2000, Month::January, 1).unwrap(),
            ),
            role: ActiveValue::Set(user::Role::Student),
            created_at: ActiveValue::Set(now()),
            ..Default::default()
        })
        .exec_with_returning(db)
        .await
        .expect("unable to create user")
        .id
    }

    async fn create_class(db: &DatabaseConnection, teacher_id: i64) -> i64 {
        class::Entity::insert(class::ActiveModel {
            name: ActiveValue::Set(String::from("Yoga")),
            description: ActiveValue::Set(String::new()),
            date: ActiveValue::Set(now()),
            capacity: ActiveValue::Set(1),
            teacher_id: ActiveValue::Set(teacher_id),
            created_at: ActiveValue::Set(now()),
            ..Default::default()
        })
        .exec_with_returning(db)
        .await
        .expect("unable to create class")
        .id
    }

    #[tokio::test]
    async fn exists() {
        let db = create_database().await;

        let exists = user::Entity::find().select_only().exists(&db).await.unwrap();

        assert!(!exists);

        create_user(&db, "teacher").await;

        let exists = user::Entity::find().select_only().exists(&db).await.unwrap();

        assert!(exists);
    }

    #[tokio::test]
    async fn roster_ordering() {
        let db = create_database().await;

        let teacher = create_user(&db, "teacher").await;
        let class_id = create_class(&db, teacher).await;

        let first = create_user(&db, "first").await;
        let second = create_user(&db, "second").await;
        let third = create_user(&db, "third").await;

        reservation::create(&db, class_id, first, reservation::Status::Confirmed)
            .await
            .unwrap();
        waitlist_entry::create(&db, class_id, third, 2).await.unwrap();
        waitlist_entry::create(&db, class_id, second, 1).await.unwrap();

        let roster = class::find_with_roster(&db, class_id).await.unwrap().unwrap();

        assert!(!roster.has_free_seat());
        assert_eq!(roster.confirmed.len(), 1);
        assert_eq!(
            roster
                .waitlist
                .iter()
                .map(|entry| (entry.user_id, entry.position))
                .collect::<Vec<_>>(),
            vec![(second, 1), (third, 2)]
        );
        assert_eq!(roster.next_waitlist_position(), 3);

        assert!(class::find_with_roster(&db, class_id + 1)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn decrement_positions_above() {
        let db = create_database().await;

        let teacher = create_user(&db, "teacher").await;
        let class_id = create_class(&db, teacher).await;
        let other_class_id = create_class(&db, teacher).await;

        let mut users = Vec::new();

        for (position, name) in (1..).zip(["first", "second", "third"]) {
            let user_id = create_user(&db, name).await;
            waitlist_entry::create(&db, class_id, user_id, position)
                .await
                .unwrap();
            users.push(user_id);
        }

        waitlist_entry::create(&db, other_class_id, users[0], 2)
            .await
            .unwrap();

        let shifted = waitlist_entry::decrement_positions_above(&db, class_id, 1)
            .await
            .unwrap();

        assert_eq!(shifted, 2);

        let third = waitlist_entry::find(&db, class_id, users[2])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(third.position, 2);

        let untouched = waitlist_entry::find(&db, other_class_id, users[0])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.position, 2);
    }

    #[tokio::test]
    async fn confirm_reuses_cancelled_reservation() {
        let db = create_database().await;

        let teacher = create_user(&db, "teacher").await;
        let class_id = create_class(&db, teacher).await;
        let student = create_user(&db, "student").await;

        let original = reservation::create(&db, class_id, student, reservation::Status::Cancelled)
            .await
            .unwrap();

        let confirmed = reservation::confirm(&db, class_id, student).await.unwrap();

        assert_eq!(confirmed.id, original.id);
        assert_eq!(confirmed.status, reservation::Status::Confirmed);

        let found = reservation::find(&db, class_id, student, Some(reservation::Status::Cancelled))
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
