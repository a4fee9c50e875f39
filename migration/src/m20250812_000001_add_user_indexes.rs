use sea_orm_migration::prelude::*;

use crate::m20220101_000001_create_users_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Listing always filters on is_deleted and sorts on updated_at by default;
// name and email back the free-text search.
const INDEXES: [(&str, User); 4] = [
    ("idx_users_email", User::Email),
    ("idx_users_name", User::Name),
    ("idx_users_is_deleted", User::IsDeleted),
    ("idx_users_updated_at", User::UpdatedAt),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, column) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(User::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, _) in INDEXES {
            manager
                .drop_index(Index::drop().name(name).table(User::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}
