use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use config::DatabaseConfig;
use db_migration::{Migrator, SchemaVersion, migration_count_for};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use thiserror::Error;

pub mod entities;
pub mod models;

pub use sea_orm::DbErr;

/// Name of the database file inside the storage directory.
pub const STORAGE_FILE_NAME: &str = "branma.db";

#[derive(Debug, Error)]
pub enum DbBootstrapError {
    #[error("bootstrap database, create storage failed: {0}")]
    CreateStorage(#[source] std::io::Error),
    #[error("bootstrap database, open database failed: {0}")]
    Open(#[source] DbErr),
    #[error("bootstrap database, upgrade schema failed: {0}")]
    Upgrade(#[source] DbErr),
    #[error("bootstrap database reset, revert database failed: {0}")]
    Reset(#[source] DbErr),
}

#[derive(Clone)]
pub struct DBService {
    pub db: DatabaseConnection,
}

impl DBService {
    /// Creates the storage directory if needed, opens the database file and
    /// migrates the schema up to `target`.
    pub async fn bootstrap(
        config: &DatabaseConfig,
        target: &SchemaVersion,
    ) -> Result<DBService, DbBootstrapError> {
        let file = create_storage(&config.storage_path)?;
        let db = open(&file).await?;
        let service = DBService { db };
        service.upgrade(target).await?;
        Ok(service)
    }

    /// Applies the migrations still missing for `target` and returns how many
    /// were applied.
    pub async fn upgrade(&self, target: &SchemaVersion) -> Result<u32, DbBootstrapError> {
        let wanted = migration_count_for(target);
        let applied = Migrator::get_applied_migrations(&self.db)
            .await
            .map_err(DbBootstrapError::Upgrade)?
            .len();

        if applied > wanted {
            tracing::warn!(
                applied,
                wanted,
                "Database schema is newer than schema version {target}, leaving it untouched"
            );
            return Ok(0);
        }

        let steps = (wanted - applied) as u32;
        if steps == 0 {
            tracing::debug!("Database schema is up to date for version {target}");
            return Ok(0);
        }

        Migrator::up(&self.db, Some(steps))
            .await
            .map_err(DbBootstrapError::Upgrade)?;
        tracing::info!(steps, "Database schema upgraded to version {target}");
        Ok(steps)
    }

    /// Reverts every migration of the database under `config`. All data is
    /// lost, development use only.
    pub async fn reset(config: &DatabaseConfig) -> Result<(), DbBootstrapError> {
        let file = create_storage(&config.storage_path)?;
        let db = open(&file).await?;

        let result = Migrator::down(&db, None).await;
        if let Err(err) = db.close().await {
            tracing::warn!("Failed to close database after reset: {}", err);
        }
        result.map_err(DbBootstrapError::Reset)?;

        tracing::info!("Database at {} has been reset", file.display());
        Ok(())
    }

    pub async fn close(self) -> Result<(), DbErr> {
        self.db.close().await
    }
}

fn create_storage(path: &Path) -> Result<PathBuf, DbBootstrapError> {
    std::fs::create_dir_all(path).map_err(DbBootstrapError::CreateStorage)?;
    Ok(path.join(STORAGE_FILE_NAME))
}

async fn open(file: &Path) -> Result<DatabaseConnection, DbBootstrapError> {
    // sqlx turns `PRAGMA foreign_keys` on for every pooled connection.
    let url = format!("sqlite://{}?mode=rwc", file.to_string_lossy());
    let mut options = ConnectOptions::new(url);
    options
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(false);
    Database::connect(options)
        .await
        .map_err(DbBootstrapError::Open)
}
