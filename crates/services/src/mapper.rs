use async_trait::async_trait;
use db::models::StoreError;
use sea_orm::DatabaseConnection;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Model exchanged over the API, kept apart from the stored row.
pub trait ApiModel: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Entity name, used in messages and as the key of the response envelope.
    const NAME: &'static str;

    fn id(&self) -> i64;

    /// True if there is nothing to persist: no id and no mandatory field.
    fn is_empty(&self) -> bool;
}

/// Which storage operation a save executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperErrorKind {
    NoData,
    NotFound,
    Load,
    Save,
    Delete,
}

#[derive(Debug, Error)]
#[error("{}", describe(.kind, .entity))]
pub struct MapperError {
    pub kind: MapperErrorKind,
    pub entity: &'static str,
    #[source]
    pub source: Option<StoreError>,
}

impl MapperError {
    pub fn no_data(entity: &'static str) -> Self {
        Self {
            kind: MapperErrorKind::NoData,
            entity,
            source: None,
        }
    }

    /// Wraps a failed read; a missing row keeps its own kind.
    pub fn load(entity: &'static str, err: StoreError) -> Self {
        let kind = match err {
            StoreError::NotFound { .. } => MapperErrorKind::NotFound,
            _ => MapperErrorKind::Load,
        };
        Self {
            kind,
            entity,
            source: Some(err),
        }
    }

    pub fn save(entity: &'static str, err: StoreError) -> Self {
        Self {
            kind: MapperErrorKind::Save,
            entity,
            source: Some(err),
        }
    }

    pub fn delete(entity: &'static str, err: StoreError) -> Self {
        Self {
            kind: MapperErrorKind::Delete,
            entity,
            source: Some(err),
        }
    }
}

impl MapperError {
    /// Database constraint the failed statement ran into, if any.
    pub fn violated_constraint(&self) -> Option<&'static str> {
        let err = self.source.as_ref()?;
        if err.is_unique_violation() {
            Some("unique")
        } else if err.is_foreign_key_violation() {
            Some("foreign key")
        } else {
            None
        }
    }
}

fn describe(kind: &MapperErrorKind, entity: &str) -> String {
    match kind {
        MapperErrorKind::NoData => format!("{entity} has no data"),
        MapperErrorKind::NotFound => format!("{entity} not found in database"),
        MapperErrorKind::Load => format!("failed to load {entity} from database"),
        MapperErrorKind::Save => format!("failed to save {entity} to database"),
        MapperErrorKind::Delete => format!("failed to delete {entity} from database"),
    }
}

/// Loads and persists API models of one entity.
#[async_trait]
pub trait EntityMapper: Send + Sync + 'static {
    type Model: ApiModel;

    fn new(db: DatabaseConnection) -> Self
    where
        Self: Sized;

    async fn load(&self, id: i64) -> Result<Self::Model, MapperError>;

    /// Creates the model when it has no id yet, updates it otherwise, and
    /// returns it as stored.
    async fn save(&self, model: Self::Model) -> Result<(Self::Model, SaveOutcome), MapperError>;

    async fn delete(&self, id: i64) -> Result<(), MapperError>;
}
