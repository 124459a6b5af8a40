use async_trait::async_trait;
use chrono::{DateTime, Utc};
use db::models::repository::Repository as RepositoryRecord;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::mapper::{ApiModel, EntityMapper, MapperError, SaveOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl ApiModel for Repository {
    const NAME: &'static str = "repository";

    fn id(&self) -> i64 {
        self.id
    }

    fn is_empty(&self) -> bool {
        self.id == 0 && self.name.is_empty() && self.url.is_empty()
    }
}

impl From<RepositoryRecord> for Repository {
    fn from(record: RepositoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            url: record.url,
            created_at: record.created_at,
            modified_at: record.modified_at,
        }
    }
}

impl From<Repository> for RepositoryRecord {
    fn from(model: Repository) -> Self {
        Self {
            id: model.id,
            name: model.name,
            url: model.url,
            created_at: model.created_at,
            modified_at: model.modified_at,
        }
    }
}

#[derive(Clone)]
pub struct RepositoryMapper {
    db: DatabaseConnection,
}

#[async_trait]
impl EntityMapper for RepositoryMapper {
    type Model = Repository;

    fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i64) -> Result<Repository, MapperError> {
        RepositoryRecord::read(&self.db, id)
            .await
            .map(Repository::from)
            .map_err(|err| MapperError::load(Repository::NAME, err))
    }

    async fn save(&self, model: Repository) -> Result<(Repository, SaveOutcome), MapperError> {
        if model.is_empty() {
            return Err(MapperError::no_data(Repository::NAME));
        }

        let record = RepositoryRecord::from(model);
        let (stored, outcome) = if record.id == 0 {
            (
                RepositoryRecord::create(&self.db, &record).await,
                SaveOutcome::Created,
            )
        } else {
            (
                RepositoryRecord::update(&self.db, &record).await,
                SaveOutcome::Updated,
            )
        };

        let stored = stored.map_err(|err| MapperError::save(Repository::NAME, err))?;
        Ok((stored.into(), outcome))
    }

    async fn delete(&self, id: i64) -> Result<(), MapperError> {
        let removed = RepositoryRecord::delete(&self.db, id)
            .await
            .map_err(|err| MapperError::delete(Repository::NAME, err))?;
        tracing::debug!(id, removed, "Deleted repository");
        Ok(())
    }
}
