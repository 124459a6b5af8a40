use sea_orm_migration::prelude::*;

use crate::columns::{
    drop_modified_at_trigger, fk_id_col, modified_at_trigger, pk_id_col, text_col, timestamp_col,
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
                    .table(Branches::Table)
                    .col(pk_id_col(Branches::Id))
                    .col(ColumnDef::new(Branches::BranchName).string().not_null())
                    .col(text_col(Branches::TicketId))
                    .col(text_col(Branches::ParentTicketId))
                    .col(fk_id_col(Branches::RepositoryId))
                    .col(text_col(Branches::TicketSummary))
                    .col(text_col(Branches::TicketStatus))
                    .col(text_col(Branches::TicketType))
                    .col(
                        ColumnDef::new(Branches::Closed)
                            .boolean()
                            .not_null()
                            .default(Expr::val(false)),
                    )
                    .col(timestamp_col(Branches::CreatedAt))
                    .col(timestamp_col(Branches::ModifiedAt))
                    // No cascade: removing a repository that still owns
                    // branches is rejected by the engine.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_branches_repository_id")
                            .from(Branches::Table, Branches::RepositoryId)
                            .to(Repositories::Table, Repositories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_branches_name_repository_id")
                    .table(Branches::Table)
                    .col(Branches::BranchName)
                    .col(Branches::RepositoryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_branches_ticket_id")
                    .table(Branches::Table)
                    .col(Branches::TicketId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(&modified_at_trigger("branches"))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&drop_modified_at_trigger("branches"))
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_branches_ticket_id")
                    .table(Branches::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_branches_name_repository_id")
                    .table(Branches::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Branches::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Branches {
    Table,
    Id,
    BranchName,
    TicketId,
    ParentTicketId,
    RepositoryId,
    TicketSummary,
    TicketStatus,
    TicketType,
    Closed,
    CreatedAt,
    ModifiedAt,
}

#[derive(Iden)]
enum Repositories {
    Table,
    Id,
}
