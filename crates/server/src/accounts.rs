//! User account creation and password verification.

use bcrypt::BcryptError;
use db::{
    now, user, ActiveValue, ColumnTrait, ConnectionTrait, Date, DbErr, EntityTrait, QueryFilter,
    QuerySelect, SelectExt,
};
use derive_more::{Display, Error, From};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Usernames consist of latin letters, digits, dots, dashes and underscores.
static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[A-Za-z0-9_.-]{3,32}$"#).expect("invalid regex string"));

/// Errors that may occur during the account creation process.
#[derive(Debug, Display, From, Error)]
pub(crate) enum AccountError {
    /// Database-related error.
    Database(DbErr),

    /// Password hashing error.
    Hashing(BcryptError),

    /// Email or username is taken by another user.
    #[display(fmt = "email or username already in use")]
    AlreadyInUse,
}

/// Personal details of a new user.
#[derive(Deserialize, Validate, JsonSchema)]
pub(crate) struct AccountDetails {
    /// Full name.
    #[validate(length(min = 1, max = 128))]
    #[schemars(example = "crate::schema::example_name")]
    pub name: String,

    /// Email address, used to log in.
    #[validate(email)]
    #[schemars(example = "crate::schema::example_email")]
    pub email: String,

    /// Unique username.
    #[validate(regex = "USERNAME_REGEX")]
    #[schemars(example = "crate::schema::example_username")]
    pub username: String,

    /// Plain text password.
    #[validate(length(min = 8, max = 72))]
    #[schemars(example = "crate::schema::example_password")]
    pub password: String,

    /// Birth date in `YYYY-MM-DD` format.
    #[serde(with = "crate::birth_date")]
    #[schemars(with = "String", example = "crate::schema::example_birth_date")]
    pub birth_date: Date,
}

/// Public user information.
#[derive(Serialize, JsonSchema)]
pub(crate) struct UserSummary {
    /// User identifier.
    #[schemars(example = "crate::schema::example_database_identifier")]
    pub id: i64,

    /// Full name.
    #[schemars(example = "crate::schema::example_name")]
    pub name: String,

    /// Email address.
    #[schemars(example = "crate::schema::example_email")]
    pub email: String,

    /// User role.
    #[schemars(example = "crate::schema::example_role")]
    pub role: user::Role,
}

impl From<user::Model> for UserSummary {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Insert a new user with the provided role.
pub(crate) async fn create_account<C: ConnectionTrait + Send>(
    db: &C,
    details: AccountDetails,
    role: user::Role,
    password_cost: u32,
) -> Result<user::Model, AccountError> {
    let in_use = user::Entity::find()
        .select_only()
        .filter(
            user::Column::Email
                .eq(details.email.as_str())
                .or(user::Column::Username.eq(details.username.as_str())),
        )
        .exists(db)
        .await?;

    if in_use {
        return Err(AccountError::AlreadyInUse);
    }

    let password_hash = bcrypt::hash(&details.password, password_cost)?;

    let model = user::Entity::insert(user::ActiveModel {
        name: ActiveValue::Set(details.name),
        email: ActiveValue::Set(details.email),
        username: ActiveValue::Set(details.username),
        password_hash: ActiveValue::Set(password_hash),
        birth_date: ActiveValue::Set(details.birth_date),
        role: ActiveValue::Set(role),
        created_at: ActiveValue::Set(now()),
        ..Default::default()
    })
    .exec_with_returning(db)
    .await?;

    Ok(model)
}

/// Check a plain text password against a stored hash.
///
/// Malformed hashes are treated as a mismatch.
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use db::{user, Date, EntityTrait, TransactionTrait};
    use time::Month;

    use super::{create_account, verify_password, AccountDetails, AccountError};
    use crate::testing::create_database;

    fn details(email: &str, username: &str) -> AccountDetails {
        AccountDetails {
            name: String::from("Jane Doe"),
            email: String::from(email),
            username: String::from(username),
            password: String::from("password123"),
            birth_date: Date::from_calendar_date(1990, Month::May, 17).unwrap(),
        }
    }

    #[tokio::test]
    async fn hashes_password() {
        let db = create_database().await;

        let user = create_account(
            &db,
            details("jane@example.com", "jane"),
            user::Role::Student,
            4,
        )
        .await
        .unwrap();

        assert_ne!(user.password_hash, "password123");
        assert!(verify_password("password123", &user.password_hash));
        assert!(!verify_password("password124", &user.password_hash));
    }

    #[tokio::test]
    async fn rejects_taken_email_or_username() {
        let db = create_database().await;

        create_account(
            &db,
            details("jane@example.com", "jane"),
            user::Role::Student,
            4,
        )
        .await
        .unwrap();

        let same_email = create_account(
            &db,
            details("jane@example.com", "other"),
            user::Role::Student,
            4,
        )
        .await;
        assert!(matches!(same_email, Err(AccountError::AlreadyInUse)));

        let same_username = create_account(
            &db,
            details("other@example.com", "jane"),
            user::Role::Teacher,
            4,
        )
        .await;
        assert!(matches!(same_username, Err(AccountError::AlreadyInUse)));
    }

    #[tokio::test]
    async fn creates_inside_transaction() {
        let db = create_database().await;

        let txn = db.begin().await.unwrap();

        let user = create_account(
            &txn,
            details("jane@example.com", "jane"),
            user::Role::Teacher,
            4,
        )
        .await
        .unwrap();
        assert_eq!(user.role, user::Role::Teacher);

        let taken = create_account(
            &txn,
            details("jane@example.com", "jane"),
            user::Role::Student,
            4,
        )
        .await;
        assert!(matches!(taken, Err(AccountError::AlreadyInUse)));

        txn.rollback().await.unwrap();

        assert!(user::Entity::find().all(&db).await.unwrap().is_empty());
    }
}
