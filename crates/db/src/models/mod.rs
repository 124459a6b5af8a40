use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub mod branch;
pub mod repository;

/// Failures of the row-store. Validation variants are raised before any
/// statement runs, everything else comes from the engine.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("id is mandatory for this operation")]
    IdMissing,
    #[error("id should be not set for this operation, use update instead")]
    IdAlreadySet,
    #[error("no data or mandatory data missing")]
    DataMissing,
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self.sql_err(),
            Some(SqlErr::UniqueConstraintViolation(_))
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self.sql_err(),
            Some(SqlErr::ForeignKeyConstraintViolation(_))
        )
    }

    fn sql_err(&self) -> Option<SqlErr> {
        match self {
            StoreError::Database(err) => err.sql_err(),
            _ => None,
        }
    }
}
