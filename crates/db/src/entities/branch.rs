use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "branches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub branch_name: String,
    pub ticket_id: String,
    pub parent_ticket_id: String,
    pub repository_id: i64,
    pub ticket_summary: String,
    pub ticket_status: String,
    pub ticket_type: String,
    pub closed: bool,
    pub created_at: DateTimeUtc,
    pub modified_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
