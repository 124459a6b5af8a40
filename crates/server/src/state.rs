use std::sync::Arc;

use config::Config;
use sea_orm::DatabaseConnection;
use services::EntityMapper;

/// Shared by every handler; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn mapper<M: EntityMapper>(&self) -> M {
        M::new(self.db.clone())
    }
}
