use db::{class, now, user, ActiveValue, Database, DatabaseConnection, Date, EntityTrait};
use migration::MigratorTrait;

pub(crate) async fn create_database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("unable to create test database");

    migration::Migrator::up(&db, None)
        .await
        .expect("unable to run migrations");

    db
}

pub(crate) async fn create_user(db: &DatabaseConnection, username: &str) -> i64 {
    user::Entity::insert(user::ActiveModel {
        name: ActiveValue::Set(String::from(username)),
        email: ActiveValue::Set(format!("{username}@example.com")),
        username: ActiveValue::Set(String::from(username)),
        password_hash: ActiveValue::Set(String::new()),
        birth_date: ActiveValue::Set(
            Date::from_julian_day(2_451_545).expect("invalid birth date"),
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

pub(crate) async fn create_class(db: &DatabaseConnection, teacher_id: i64, capacity: i32) -> i64 {
    class::Entity::insert(class::ActiveModel {
        name: ActiveValue::Set(String::from("Morning yoga")),
        description: ActiveValue::Set(String::from("Beginner friendly")),
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

/// Check capacity, waitlist contiguity and idle seat invariants of a class.
pub(crate) async fn assert_invariants(db: &DatabaseConnection, class_id: i64) {
    let roster = class::find_with_roster(db, class_id)
        .await
        .expect("unable to load class")
        .expect("class not found");

    assert!(roster.confirmed.len() as i64 <= i64::from(roster.class.capacity));

    let positions: Vec<i32> = roster.waitlist.iter().map(|entry| entry.position).collect();
    let expected: Vec<i32> = (1..=positions.len() as i32).collect();
    assert_eq!(positions, expected);

    if roster.has_free_seat() {
        assert!(roster.waitlist.is_empty());
    }
}
