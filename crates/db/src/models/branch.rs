use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};

use super::StoreError;
use crate::entities::branch;

/// A row of the `branches` table, linking a feature branch of a repository
/// to its ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branch {
    pub id: i64,
    pub branch_name: String,
    pub ticket_id: String,
    pub parent_ticket_id: String,
    pub repository_id: i64,
    pub ticket_summary: String,
    pub ticket_status: String,
    pub ticket_type: String,
    pub closed: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Branch {
    const ENTITY: &'static str = "branch";

    fn from_model(model: branch::Model) -> Self {
        Self {
            id: model.id,
            branch_name: model.branch_name,
            ticket_id: model.ticket_id,
            parent_ticket_id: model.parent_ticket_id,
            repository_id: model.repository_id,
            ticket_summary: model.ticket_summary,
            ticket_status: model.ticket_status,
            ticket_type: model.ticket_type,
            closed: model.closed,
            created_at: Some(model.created_at),
            modified_at: Some(model.modified_at),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.branch_name.is_empty() && self.repository_id != 0
    }

    pub async fn create<C: ConnectionTrait>(db: &C, record: &Self) -> Result<Self, StoreError> {
        if !record.is_valid() {
            return Err(StoreError::DataMissing);
        }
        if record.id != 0 {
            return Err(StoreError::IdAlreadySet);
        }

        let active = branch::ActiveModel {
            id: NotSet,
            branch_name: Set(record.branch_name.clone()),
            ticket_id: Set(record.ticket_id.clone()),
            parent_ticket_id: Set(record.parent_ticket_id.clone()),
            repository_id: Set(record.repository_id),
            ticket_summary: Set(record.ticket_summary.clone()),
            ticket_status: Set(record.ticket_status.clone()),
            ticket_type: Set(record.ticket_type.clone()),
            closed: Set(record.closed),
            created_at: NotSet,
            modified_at: NotSet,
        };
        let inserted = branch::Entity::insert(active).exec(db).await?;

        Self::read(db, inserted.last_insert_id).await
    }

    pub async fn read<C: ConnectionTrait>(db: &C, id: i64) -> Result<Self, StoreError> {
        if id == 0 {
            return Err(StoreError::IdMissing);
        }

        branch::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Self::from_model)
            .ok_or(StoreError::NotFound {
                entity: Self::ENTITY,
                id,
            })
    }

    pub async fn update<C: ConnectionTrait>(db: &C, record: &Self) -> Result<Self, StoreError> {
        if !record.is_valid() {
            return Err(StoreError::DataMissing);
        }
        if record.id == 0 {
            return Err(StoreError::IdMissing);
        }

        branch::Entity::update_many()
            .col_expr(
                branch::Column::BranchName,
                Expr::value(record.branch_name.clone()),
            )
            .col_expr(branch::Column::TicketId, Expr::value(record.ticket_id.clone()))
            .col_expr(
                branch::Column::ParentTicketId,
                Expr::value(record.parent_ticket_id.clone()),
            )
            .col_expr(branch::Column::RepositoryId, Expr::value(record.repository_id))
            .col_expr(
                branch::Column::TicketSummary,
                Expr::value(record.ticket_summary.clone()),
            )
            .col_expr(
                branch::Column::TicketStatus,
                Expr::value(record.ticket_status.clone()),
            )
            .col_expr(
                branch::Column::TicketType,
                Expr::value(record.ticket_type.clone()),
            )
            .col_expr(branch::Column::Closed, Expr::value(record.closed))
            .filter(branch::Column::Id.eq(record.id))
            .exec(db)
            .await?;

        Self::read(db, record.id).await
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, StoreError> {
        if id == 0 {
            return Err(StoreError::IdMissing);
        }

        let result = branch::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::{repository::Repository, test_db::setup_db};

    async fn create_repository<C: ConnectionTrait>(db: &C) -> Repository {
        Repository::create(
            db,
            &Repository {
                name: "branma_be".to_string(),
                url: "git@github.com:rebel-l/branma_be.git".to_string(),
                ..Repository::default()
            },
        )
        .await
        .unwrap()
    }

    fn sample(repository_id: i64) -> Branch {
        Branch {
            branch_name: "feature/BRA-1_store".to_string(),
            ticket_id: "BRA-1".to_string(),
            parent_ticket_id: "BRA-0".to_string(),
            repository_id,
            ticket_summary: "Add branch store".to_string(),
            ticket_status: "In Progress".to_string(),
            ticket_type: "Story".to_string(),
            ..Branch::default()
        }
    }

    #[tokio::test]
    async fn create_then_read_returns_same_row() {
        let db = setup_db().await;
        let repository = create_repository(&db).await;

        let created = Branch::create(&db, &sample(repository.id)).await.unwrap();

        assert_ne!(created.id, 0);
        assert_eq!(created.repository_id, repository.id);
        assert_eq!(created.ticket_id, "BRA-1");
        assert!(!created.closed);
        assert!(created.created_at.is_some());
        assert_eq!(created.created_at, created.modified_at);
        assert_eq!(Branch::read(&db, created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn optional_ticket_fields_default_to_empty() {
        let db = setup_db().await;
        let repository = create_repository(&db).await;
        let minimal = Branch {
            branch_name: "main".to_string(),
            repository_id: repository.id,
            ..Branch::default()
        };

        let created = Branch::create(&db, &minimal).await.unwrap();

        assert_eq!(created.ticket_id, "");
        assert_eq!(created.ticket_summary, "");
    }

    #[tokio::test]
    async fn create_validates_mandatory_fields_and_id() {
        let db = setup_db().await;

        let without_repository = Branch {
            repository_id: 0,
            ..sample(0)
        };
        assert!(matches!(
            Branch::create(&db, &without_repository).await.unwrap_err(),
            StoreError::DataMissing
        ));

        let with_id = Branch { id: 3, ..sample(1) };
        assert!(matches!(
            Branch::create(&db, &with_id).await.unwrap_err(),
            StoreError::IdAlreadySet
        ));
    }

    #[tokio::test]
    async fn create_for_unknown_repository_violates_foreign_key() {
        let db = setup_db().await;

        let err = Branch::create(&db, &sample(404)).await.unwrap_err();

        assert!(err.is_foreign_key_violation(), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn same_branch_name_twice_in_repository_is_rejected() {
        let db = setup_db().await;
        let repository = create_repository(&db).await;
        Branch::create(&db, &sample(repository.id)).await.unwrap();

        let err = Branch::create(&db, &sample(repository.id))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation(), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_advances_modified_at() {
        let db = setup_db().await;
        let repository = create_repository(&db).await;
        let created = Branch::create(&db, &sample(repository.id)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        let changed = Branch {
            ticket_status: "Done".to_string(),
            closed: true,
            ..created.clone()
        };
        let updated = Branch::update(&db, &changed).await.unwrap();

        assert_eq!(updated.ticket_status, "Done");
        assert!(updated.closed);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.modified_at > created.modified_at);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let db = setup_db().await;
        let repository = create_repository(&db).await;
        let ghost = Branch {
            id: 77,
            ..sample(repository.id)
        };

        assert!(matches!(
            Branch::update(&db, &ghost).await.unwrap_err(),
            StoreError::NotFound { id: 77, .. }
        ));
    }

    #[tokio::test]
    async fn delete_removes_row_and_tolerates_unknown_ids() {
        let db = setup_db().await;
        let repository = create_repository(&db).await;
        let created = Branch::create(&db, &sample(repository.id)).await.unwrap();

        assert_eq!(Branch::delete(&db, created.id).await.unwrap(), 1);
        assert_eq!(Branch::delete(&db, created.id).await.unwrap(), 0);
        assert!(matches!(
            Branch::read(&db, created.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn repository_with_branches_cannot_be_deleted() {
        let db = setup_db().await;
        let repository = create_repository(&db).await;
        Branch::create(&db, &sample(repository.id)).await.unwrap();

        let err = Repository::delete(&db, repository.id).await.unwrap_err();

        assert!(err.is_foreign_key_violation(), "unexpected error: {err:?}");
        assert!(Repository::read(&db, repository.id).await.is_ok());
    }
}
