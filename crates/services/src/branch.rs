use async_trait::async_trait;
use chrono::{DateTime, Utc};
use db::models::branch::Branch as BranchRecord;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::mapper::{ApiModel, EntityMapper, MapperError, SaveOutcome};

/// A feature branch of a tracked repository and the ticket it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl ApiModel for Branch {
    const NAME: &'static str = "branch";

    fn id(&self) -> i64 {
        self.id
    }

    fn is_empty(&self) -> bool {
        self.id == 0 && self.branch_name.is_empty() && self.repository_id == 0
    }
}

impl From<BranchRecord> for Branch {
    fn from(record: BranchRecord) -> Self {
        Self {
            id: record.id,
            branch_name: record.branch_name,
            ticket_id: record.ticket_id,
            parent_ticket_id: record.parent_ticket_id,
            repository_id: record.repository_id,
            ticket_summary: record.ticket_summary,
            ticket_status: record.ticket_status,
            ticket_type: record.ticket_type,
            closed: record.closed,
            created_at: record.created_at,
            modified_at: record.modified_at,
        }
    }
}

impl From<Branch> for BranchRecord {
    fn from(model: Branch) -> Self {
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
            created_at: model.created_at,
            modified_at: model.modified_at,
        }
    }
}

#[derive(Clone)]
pub struct BranchMapper {
    db: DatabaseConnection,
}

#[async_trait]
impl EntityMapper for BranchMapper {
    type Model = Branch;

    fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i64) -> Result<Branch, MapperError> {
        BranchRecord::read(&self.db, id)
            .await
            .map(Branch::from)
            .map_err(|err| MapperError::load(Branch::NAME, err))
    }

    async fn save(&self, model: Branch) -> Result<(Branch, SaveOutcome), MapperError> {
        if model.is_empty() {
            return Err(MapperError::no_data(Branch::NAME));
        }

        let record = BranchRecord::from(model);
        let (stored, outcome) = if record.id == 0 {
            (
                BranchRecord::create(&self.db, &record).await,
                SaveOutcome::Created,
            )
        } else {
            (
                BranchRecord::update(&self.db, &record).await,
                SaveOutcome::Updated,
            )
        };

        let stored = stored.map_err(|err| MapperError::save(Branch::NAME, err))?;
        Ok((stored.into(), outcome))
    }

    async fn delete(&self, id: i64) -> Result<(), MapperError> {
        let removed = BranchRecord::delete(&self.db, id)
            .await
            .map_err(|err| MapperError::delete(Branch::NAME, err))?;
        tracing::debug!(id, removed, "Deleted branch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mapper::MapperErrorKind,
        repository::{Repository, RepositoryMapper},
        test_db::setup_db,
    };

    async fn setup() -> (RepositoryMapper, BranchMapper, Repository) {
        let db = setup_db().await;
        let repositories = RepositoryMapper::new(db.clone());
        let (repository, _) = repositories
            .save(Repository {
                name: "branma_be".to_string(),
                url: "git@github.com:rebel-l/branma_be.git".to_string(),
                ..Repository::default()
            })
            .await
            .unwrap();
        (repositories, BranchMapper::new(db), repository)
    }

    fn sample(repository_id: i64) -> Branch {
        Branch {
            branch_name: "feature/BRA-7_mapper".to_string(),
            ticket_id: "BRA-7".to_string(),
            repository_id,
            ticket_summary: "Map branches".to_string(),
            ticket_status: "Open".to_string(),
            ticket_type: "Task".to_string(),
            ..Branch::default()
        }
    }

    #[tokio::test]
    async fn save_and_load_branch() {
        let (_, branches, repository) = setup().await;

        let (created, outcome) = branches.save(sample(repository.id)).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Created);

        let (closed, outcome) = branches
            .save(Branch {
                closed: true,
                ..created.clone()
            })
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Updated);
        assert!(closed.closed);

        assert_eq!(branches.load(created.id).await.unwrap(), closed);
    }

    #[tokio::test]
    async fn branch_of_unknown_repository_reports_foreign_key() {
        let (_, branches, _) = setup().await;

        let err = branches.save(sample(42)).await.unwrap_err();

        assert_eq!(err.kind, MapperErrorKind::Save);
        assert_eq!(err.violated_constraint(), Some("foreign key"));
    }

    #[tokio::test]
    async fn empty_branch_is_no_data() {
        let (_, branches, _) = setup().await;

        let err = branches.save(Branch::default()).await.unwrap_err();

        assert_eq!(err.kind, MapperErrorKind::NoData);
    }

    #[tokio::test]
    async fn deleting_owning_repository_fails_while_branches_exist() {
        let (repositories, branches, repository) = setup().await;
        let (branch, _) = branches.save(sample(repository.id)).await.unwrap();

        let err = repositories.delete(repository.id).await.unwrap_err();
        assert_eq!(err.kind, MapperErrorKind::Delete);
        assert_eq!(err.violated_constraint(), Some("foreign key"));

        branches.delete(branch.id).await.unwrap();
        repositories.delete(repository.id).await.unwrap();
        assert_eq!(
            repositories.load(repository.id).await.unwrap_err().kind,
            MapperErrorKind::NotFound
        );
    }
}
