use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WaitlistEntries::Table)
                    .col(
                        ColumnDef::new(WaitlistEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::Position)
                            .integer()
                            .not_null()
                            .extra("CHECK (position > 0)".to_string()),
                    )
                    .col(
                        ColumnDef::new(WaitlistEntries::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WaitlistEntries::Table, WaitlistEntries::ClassId)
                            .to(crate::Classes::Table, crate::Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(WaitlistEntries::Table, WaitlistEntries::UserId)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("class_id_user_id_waitlist_entries_idx")
                            .col(WaitlistEntries::ClassId)
                            .col(WaitlistEntries::UserId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Positions are not unique per class, since shifting them down with a single
        // UPDATE would violate a non-deferred unique constraint midway.
        manager
            .create_index(
                Index::create()
                    .name("class_id_position_waitlist_entries_idx")
                    .table(WaitlistEntries::Table)
                    .col(WaitlistEntries::ClassId)
                    .col(WaitlistEntries::Position)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WaitlistEntries::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
enum WaitlistEntries {
    Table,
    Id,
    ClassId,
    UserId,
    Position,
    CreatedAt,
}
