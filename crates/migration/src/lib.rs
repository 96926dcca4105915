pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users_table;
mod m20240301_000002_create_authentication_tokens_table;
mod m20240301_000003_create_classes_table;
mod m20240301_000004_create_reservations_table;
mod m20240301_000005_create_waitlist_entries_table;

pub(crate) use m20240301_000001_create_users_table::Users;
pub(crate) use m20240301_000003_create_classes_table::Classes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users_table::Migration),
            Box::new(m20240301_000002_create_authentication_tokens_table::Migration),
            Box::new(m20240301_000003_create_classes_table::Migration),
            Box::new(m20240301_000004_create_reservations_table::Migration),
            Box::new(m20240301_000005_create_waitlist_entries_table::Migration),
        ]
    }
}
