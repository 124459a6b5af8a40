use sea_orm_migration::prelude::*;

use crate::columns::{
    drop_modified_at_trigger, modified_at_trigger, pk_id_col, timestamp_col,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(Repositories::Table)
                    .col(pk_id_col(Repositories::Id))
                    .col(ColumnDef::new(Repositories::Name).string().not_null())
                    .col(ColumnDef::new(Repositories::Url).string().not_null())
                    .col(timestamp_col(Repositories::CreatedAt))
                    .col(timestamp_col(Repositories::ModifiedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_repositories_name_url")
                    .table(Repositories::Table)
                    .col(Repositories::Name)
                    .col(Repositories::Url)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(&modified_at_trigger("repositories"))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&drop_modified_at_trigger("repositories"))
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_repositories_name_url")
                    .table(Repositories::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Repositories::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Repositories {
    Table,
    Id,
    Name,
    Url,
    CreatedAt,
    ModifiedAt,
}
