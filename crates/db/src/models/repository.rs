use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};

use super::StoreError;
use crate::entities::repository;

/// A row of the `repositories` table. An `id` of zero means the row was
/// never stored; timestamps are owned by the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Repository {
    const ENTITY: &'static str = "repository";

    fn from_model(model: repository::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            url: model.url,
            created_at: Some(model.created_at),
            modified_at: Some(model.modified_at),
        }
    }

    /// True if every mandatory field is set.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.url.is_empty()
    }

    /// Inserts `record` and returns the stored row including the generated
    /// id and timestamps.
    pub async fn create<C: ConnectionTrait>(db: &C, record: &Self) -> Result<Self, StoreError> {
        if !record.is_valid() {
            return Err(StoreError::DataMissing);
        }
        if record.id != 0 {
            return Err(StoreError::IdAlreadySet);
        }

        let active = repository::ActiveModel {
            id: NotSet,
            name: Set(record.name.clone()),
            url: Set(record.url.clone()),
            created_at: NotSet,
            modified_at: NotSet,
        };
        let inserted = repository::Entity::insert(active).exec(db).await?;

        Self::read(db, inserted.last_insert_id).await
    }

    pub async fn read<C: ConnectionTrait>(db: &C, id: i64) -> Result<Self, StoreError> {
        if id == 0 {
            return Err(StoreError::IdMissing);
        }

        repository::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Self::from_model)
            .ok_or(StoreError::NotFound {
                entity: Self::ENTITY,
                id,
            })
    }

    /// Overwrites the mutable fields of the row with `record.id`. The
    /// database refreshes `modified_at`.
    pub async fn update<C: ConnectionTrait>(db: &C, record: &Self) -> Result<Self, StoreError> {
        if !record.is_valid() {
            return Err(StoreError::DataMissing);
        }
        if record.id == 0 {
            return Err(StoreError::IdMissing);
        }

        repository::Entity::update_many()
            .col_expr(repository::Column::Name, Expr::value(record.name.clone()))
            .col_expr(repository::Column::Url, Expr::value(record.url.clone()))
            .filter(repository::Column::Id.eq(record.id))
            .exec(db)
            .await?;

        Self::read(db, record.id).await
    }

    /// Deletes the row with `id` and returns the number of removed rows.
    /// Deleting an unknown id is not an error.
    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, StoreError> {
        if id == 0 {
            return Err(StoreError::IdMissing);
        }

        let result = repository::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::test_db::setup_db;

    fn sample(name: &str) -> Repository {
        Repository {
            name: name.to_string(),
            url: format!("git@github.com:rebel-l/{name}.git"),
            ..Repository::default()
        }
    }

    #[tokio::test]
    async fn create_then_read_returns_same_row() {
        let db = setup_db().await;

        let created = Repository::create(&db, &sample("branma_be")).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "branma_be");
        assert_eq!(created.url, "git@github.com:rebel-l/branma_be.git");
        assert!(created.created_at.is_some());
        assert_eq!(created.created_at, created.modified_at);

        let read = Repository::read(&db, created.id).await.unwrap();
        assert_eq!(read, created);
    }

    #[tokio::test]
    async fn create_rejects_invalid_records() {
        let db = setup_db().await;

        let err = Repository::create(&db, &Repository::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DataMissing));

        let missing_url = Repository {
            url: String::new(),
            ..sample("branma_be")
        };
        let err = Repository::create(&db, &missing_url).await.unwrap_err();
        assert!(matches!(err, StoreError::DataMissing));

        let with_id = Repository {
            id: 7,
            ..sample("branma_be")
        };
        let err = Repository::create(&db, &with_id).await.unwrap_err();
        assert!(matches!(err, StoreError::IdAlreadySet));
    }

    #[tokio::test]
    async fn create_duplicate_violates_unique_key() {
        let db = setup_db().await;
        Repository::create(&db, &sample("branma_be")).await.unwrap();

        let err = Repository::create(&db, &sample("branma_be"))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation(), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn read_requires_id_and_existing_row() {
        let db = setup_db().await;

        assert!(matches!(
            Repository::read(&db, 0).await.unwrap_err(),
            StoreError::IdMissing
        ));
        assert!(matches!(
            Repository::read(&db, 999).await.unwrap_err(),
            StoreError::NotFound { id: 999, .. }
        ));
    }

    #[tokio::test]
    async fn update_advances_modified_at_only() {
        let db = setup_db().await;
        let created = Repository::create(&db, &sample("branma_be")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        let changed = Repository {
            name: "branma_fe".to_string(),
            ..created.clone()
        };
        let updated = Repository::update(&db, &changed).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "branma_fe");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.modified_at > created.modified_at);
    }

    #[tokio::test]
    async fn update_validates_before_touching_storage() {
        let db = setup_db().await;

        let err = Repository::update(&db, &sample("branma_be"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::IdMissing));

        let err = Repository::update(
            &db,
            &Repository {
                id: 1,
                ..Repository::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::DataMissing));
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let db = setup_db().await;
        let ghost = Repository {
            id: 42,
            ..sample("ghost")
        };

        let err = Repository::update(&db, &ghost).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let db = setup_db().await;
        let created = Repository::create(&db, &sample("branma_be")).await.unwrap();

        assert_eq!(Repository::delete(&db, created.id).await.unwrap(), 1);
        assert_eq!(Repository::delete(&db, created.id).await.unwrap(), 0);
        assert!(matches!(
            Repository::read(&db, created.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert!(matches!(
            Repository::delete(&db, 0).await.unwrap_err(),
            StoreError::IdMissing
        ));
    }
}
